use crate::domain::error::{AuthError, AuthResult};
use crate::domain::models::token::{Claim, TokenPayload};
use crate::domain::models::user::User;
use crate::domain::services::payload::{Payload, PayloadFactory};

const ID_KEY: &str = "id";
const EMAIL_KEY: &str = "email";
const NAME_KEY: &str = "name";

/// Identifies a user by `id` and `email`, carrying `name` when known.
pub struct UserPayload {
    user: User,
}

impl Payload for UserPayload {
    fn user(&self) -> User {
        self.user.clone()
    }

    fn token_payload(&self) -> TokenPayload {
        let mut payload = TokenPayload::new();
        payload.insert(ID_KEY, self.user.id.as_str());
        payload.insert(EMAIL_KEY, self.user.email.as_str());
        if !self.user.name.is_empty() {
            payload.insert(NAME_KEY, self.user.name.as_str());
        }
        payload
    }
}

pub struct UserPayloadFactory;

impl PayloadFactory for UserPayloadFactory {
    fn from_user(&self, user: &User) -> AuthResult<Box<dyn Payload>> {
        if user.id.is_empty() {
            return Err(AuthError::PayloadConversion("user ID is empty".to_string()));
        }
        if user.email.is_empty() {
            return Err(AuthError::PayloadConversion(
                "user email is empty".to_string(),
            ));
        }

        Ok(Box::new(UserPayload { user: user.clone() }))
    }

    fn from_token_payload(&self, payload: &TokenPayload) -> AuthResult<Box<dyn Payload>> {
        let id = required_text(payload, ID_KEY)?;
        let email = required_text(payload, EMAIL_KEY)?;
        let name = match payload.get(NAME_KEY) {
            None => String::new(),
            Some(claim) => claim
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| unexpected_kind(NAME_KEY, claim))?,
        };

        Ok(Box::new(UserPayload {
            user: User { id, name, email },
        }))
    }
}

fn required_text(payload: &TokenPayload, key: &str) -> AuthResult<String> {
    let claim = payload
        .get(key)
        .ok_or_else(|| AuthError::PayloadConversion(format!("{key} not found in token payload")))?;

    match claim.as_str() {
        Some("") => Err(AuthError::PayloadConversion(format!(
            "{key} is empty in token payload"
        ))),
        Some(value) => Ok(value.to_owned()),
        None => Err(unexpected_kind(key, claim)),
    }
}

fn unexpected_kind(key: &str, claim: &Claim) -> AuthError {
    AuthError::PayloadConversion(format!("{key} must be text, found {}", claim.kind()))
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Clone, Default)]
    pub struct PayloadStub {
        pub user: User,
        pub token_payload: TokenPayload,
    }

    impl Payload for PayloadStub {
        fn user(&self) -> User {
            self.user.clone()
        }

        fn token_payload(&self) -> TokenPayload {
            self.token_payload.clone()
        }
    }

    /// Hands out the same payload for every call, or the configured error.
    #[derive(Clone, Default)]
    pub struct PayloadFactoryStub {
        pub payload: PayloadStub,
        pub token_err: Option<AuthError>,
        pub user_err: Option<AuthError>,
    }

    impl PayloadFactory for PayloadFactoryStub {
        fn from_user(&self, _: &User) -> AuthResult<Box<dyn Payload>> {
            match &self.user_err {
                Some(err) => Err(err.clone()),
                None => Ok(Box::new(self.payload.clone())),
            }
        }

        fn from_token_payload(&self, _: &TokenPayload) -> AuthResult<Box<dyn Payload>> {
            match &self.token_err {
                Some(err) => Err(err.clone()),
                None => Ok(Box::new(self.payload.clone())),
            }
        }
    }
}
