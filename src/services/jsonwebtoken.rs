use crate::domain::error::{AuthError, AuthResult};
use crate::domain::models::token::TokenPayload;
use crate::domain::services::tokenizer::Tokenizer;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

#[derive(Clone)]
pub struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    pub fn from_rsa_pem(
        private_key: Vec<u8>,
        public_key: Vec<u8>,
    ) -> Result<Self, JsonWebTokenError> {
        Ok(KeyPair {
            encoding: EncodingKey::from_rsa_pem(&private_key)?,
            decoding: DecodingKey::from_rsa_pem(&public_key)?,
        })
    }
}

/// RS256 JWT tokenizer.
///
/// Only the signature is verified on decode. Registered claims such as
/// `exp` are left to the caller, which tracks expiry through `issued_at`.
pub struct JwtTokenizer {
    keys: KeyPair,
    header: Header,
    validation: Validation,
}

impl JwtTokenizer {
    pub fn new(keys: KeyPair) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        JwtTokenizer {
            keys,
            header: Header::new(Algorithm::RS256),
            validation,
        }
    }
}

impl Tokenizer for JwtTokenizer {
    fn encode(&self, payload: &TokenPayload) -> AuthResult<String> {
        encode(&self.header, payload, &self.keys.encoding)
            .map_err(|err| AuthError::TokenEncode(format!("{:?}", err.kind())))
    }

    fn decode(&self, token: &str) -> AuthResult<TokenPayload> {
        decode::<TokenPayload>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| AuthError::TokenDecode(format!("{:?}", err.kind())))
    }
}
