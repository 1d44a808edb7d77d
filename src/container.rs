use std::sync::Arc;

use chrono::TimeDelta;

use crate::domain::services::timer::Timer;
use crate::domain::services::tokenizer::Tokenizer;

use crate::services::authenticator::{Authenticator, AuthenticatorFactory};
use crate::services::issuer::IssuerFactory;
use crate::services::payload::UserPayloadFactory;

pub struct Container {
    pub authenticator: Authenticator,
    pub issuer_key: Option<String>,
}

impl Container {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        timer: Arc<dyn Timer>,
        token_valid_duration: TimeDelta,
    ) -> Self {
        let authenticator_factory = authenticator_factory(tokenizer, timer, token_valid_duration);

        Container {
            authenticator: authenticator_factory.make_authenticator(Arc::new(UserPayloadFactory)),
            issuer_key: None,
        }
    }

    /// Opens `POST /tokens` to callers presenting `issuer_key`.
    pub fn with_issuer_key(self, issuer_key: Option<String>) -> Self {
        Container { issuer_key, ..self }
    }
}

fn authenticator_factory(
    tokenizer: Arc<dyn Tokenizer>,
    timer: Arc<dyn Timer>,
    token_valid_duration: TimeDelta,
) -> AuthenticatorFactory {
    let issuer_factory = IssuerFactory::new(tokenizer, timer.clone());

    AuthenticatorFactory::new(timer, token_valid_duration, issuer_factory)
}
