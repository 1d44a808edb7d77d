use crate::domain::{error::AuthResult, models::token::TokenPayload};

/// Turns a claim mapping into a tamper-evident string and back.
pub trait Tokenizer: 'static + Sync + Send {
    fn encode(&self, payload: &TokenPayload) -> AuthResult<String>;
    fn decode(&self, token: &str) -> AuthResult<TokenPayload>;
}
