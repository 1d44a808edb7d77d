use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{
    error::{AuthError, AuthResult},
    models::token::{Claim, Token},
    models::user::User,
    services::{payload::PayloadFactory, timer::Timer, tokenizer::Tokenizer},
};

/// Reserved claim holding the server-side issuance time.
pub const ISSUED_AT_KEY: &str = "issued_at";

/// Stamps tokens with the issuance time and drives the tokenizer.
#[derive(Clone)]
pub struct Issuer {
    tokenizer: Arc<dyn Tokenizer>,
    timer: Arc<dyn Timer>,
    payload_factory: Arc<dyn PayloadFactory>,
}

impl Issuer {
    pub fn issued_token(&self, user: &User) -> AuthResult<String> {
        let issued_at = self.timer.now();
        let payload = self.payload_factory.from_user(user)?;

        let mut token_payload = payload.token_payload();
        if let Some(previous) = token_payload.insert(ISSUED_AT_KEY, format_time(issued_at)) {
            tracing::warn!(?previous, "payload declared its own issued_at, overwriting");
        }

        self.tokenizer.encode(&token_payload)
    }

    pub fn parse_token(&self, token: &str) -> AuthResult<Token> {
        let token_payload = self.tokenizer.decode(token)?;

        let issued_at = token_payload
            .get(ISSUED_AT_KEY)
            .ok_or_else(|| AuthError::MissingClaim(ISSUED_AT_KEY.to_string()))?;
        let issued_at = parse_time(issued_at)?;

        let payload = self.payload_factory.from_token_payload(&token_payload)?;

        Ok(Token {
            user: payload.user(),
            issued_at,
        })
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_time(claim: &Claim) -> AuthResult<DateTime<Utc>> {
    let text = claim.as_str().ok_or_else(|| AuthError::InvalidClaimFormat {
        claim: ISSUED_AT_KEY.to_string(),
        reason: format!("expected text, found {}", claim.kind()),
    })?;

    DateTime::parse_from_rfc3339(text)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|err| AuthError::InvalidClaimFormat {
            claim: ISSUED_AT_KEY.to_string(),
            reason: err.to_string(),
        })
}

/// Shares one tokenizer and timer across payload shapes.
#[derive(Clone)]
pub struct IssuerFactory {
    tokenizer: Arc<dyn Tokenizer>,
    timer: Arc<dyn Timer>,
}

impl IssuerFactory {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, timer: Arc<dyn Timer>) -> Self {
        IssuerFactory { tokenizer, timer }
    }

    pub fn make_issuer(&self, payload_factory: Arc<dyn PayloadFactory>) -> Issuer {
        Issuer {
            tokenizer: self.tokenizer.clone(),
            timer: self.timer.clone(),
            payload_factory,
        }
    }
}
