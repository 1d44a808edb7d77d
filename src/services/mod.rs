pub mod authenticator;
pub mod issuer;
pub mod jsonwebtoken;
pub mod payload;
pub mod timer;
