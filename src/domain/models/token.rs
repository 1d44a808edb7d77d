use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::user::User;

/// A single claim value carried inside a token.
///
/// Only these shapes are accepted when a token is decoded; anything else
/// (JSON `null` for instance) fails deserialization at the tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Claim {
    Bool(bool),
    Integer(i64),
    // Whole numbers above `i64::MAX`, kept exact instead of widening to float.
    Unsigned(u64),
    Float(f64),
    Text(String),
    List(Vec<Claim>),
    Map(BTreeMap<String, Claim>),
}

impl Claim {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) | Self::Unsigned(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<&str> for Claim {
    fn from(value: &str) -> Self {
        Claim::Text(value.to_owned())
    }
}

impl From<String> for Claim {
    fn from(value: String) -> Self {
        Claim::Text(value)
    }
}

impl From<i64> for Claim {
    fn from(value: i64) -> Self {
        Claim::Integer(value)
    }
}

impl From<bool> for Claim {
    fn from(value: bool) -> Self {
        Claim::Bool(value)
    }
}

/// Claim name to value mapping embedded in a token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenPayload(BTreeMap<String, Claim>);

impl TokenPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Claim> {
        self.0.get(name)
    }

    /// Sets `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, claim: impl Into<Claim>) -> Option<Claim> {
        self.0.insert(name.into(), claim.into())
    }
}

impl<K, V> FromIterator<(K, V)> for TokenPayload
where
    K: Into<String>,
    V: Into<Claim>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TokenPayload(
            iter.into_iter()
                .map(|(name, claim)| (name.into(), claim.into()))
                .collect(),
        )
    }
}

/// Result of parsing a token: who it represents and when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub user: User,
    pub issued_at: DateTime<Utc>,
}
