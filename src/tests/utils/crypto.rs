use once_cell::sync::Lazy;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;

use crate::services::jsonwebtoken::{JwtTokenizer, KeyPair};

// RSA generation is slow, most tests sign with this one.
static SHARED_KEYPAIR: Lazy<KeyPair> = Lazy::new(generate_keypair);

/// Fresh RS256 key pair, distinct from every other call.
pub fn generate_keypair() -> KeyPair {
    let pkey = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();

    KeyPair::from_rsa_pem(
        pkey.private_key_to_pem_pkcs8().unwrap(),
        pkey.public_key_to_pem().unwrap(),
    )
    .unwrap()
}

pub fn jwt_tokenizer() -> JwtTokenizer {
    JwtTokenizer::new(SHARED_KEYPAIR.clone())
}

/// Flips one character of the payload segment, leaving the signature intact.
pub fn tamper(token: &str) -> String {
    let index = token.find('.').unwrap() + 5;
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}
