use crate::domain::{
    error::AuthResult,
    models::{token::TokenPayload, user::User},
};

/// Translation between a user and the claims embedded in its token.
pub trait Payload: Send {
    fn user(&self) -> User;
    fn token_payload(&self) -> TokenPayload;
}

/// Builds payloads for one claim shape.
///
/// `from_token_payload` receives every decoded claim, including the
/// reserved `issued_at`, and must ignore the ones it does not own.
pub trait PayloadFactory: 'static + Sync + Send {
    fn from_user(&self, user: &User) -> AuthResult<Box<dyn Payload>>;
    fn from_token_payload(&self, payload: &TokenPayload) -> AuthResult<Box<dyn Payload>>;
}
