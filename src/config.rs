use chrono::TimeDelta;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

const ONE_WEEK: u32 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub jsonwebtoken: JsonWebTokenConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct JsonWebTokenConfig {
    pub public_keyfile: String,
    pub private_keyfile: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    pub level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    pub token_valid_seconds: u32,
    /// Secret callers of `POST /tokens` present; issuance is closed when unset.
    pub issuer_key: Option<String>,
}

impl SessionConfig {
    pub fn token_valid_duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.token_valid_seconds))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(AppConfig {
                service: ServiceConfig {
                    name: "short-auth".to_string(),
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                    otlp_endpoint: None,
                },
                jsonwebtoken: JsonWebTokenConfig {
                    public_keyfile: "config/public_key.pem".to_string(),
                    private_keyfile: "config/private_key.pem".to_string(),
                },
                session: SessionConfig {
                    token_valid_seconds: ONE_WEEK,
                    issuer_key: None,
                },
            }))
            .merge(Toml::file("config/default.toml"))
            .merge(Toml::file(format!(
                "config/{}.toml",
                std::env::var("RUST_ENV").unwrap_or("development".to_string())
            )))
            .merge(Env::prefixed("APP_").split("__"))
    }
}
