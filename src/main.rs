mod api;
mod app;
mod config;
mod container;
mod domain;
mod services;
mod telemetry;

use config::AppConfig;
use container::Container;
use services::jsonwebtoken::{JwtTokenizer, KeyPair};
use services::timer::SystemTimer;

use actix_web::HttpServer;
use std::fs;
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
mod tests;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Configuration(#[from] figment::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error(transparent)]
    JsonWebToken(#[from] jsonwebtoken::errors::Error),
    #[error("{0}: {1}")]
    ReadKey(String, String),
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let provider = telemetry::configure(&config.service, &config.logging)?;

    let private_key = read_key(&config.jsonwebtoken.private_keyfile)?;
    let public_key = read_key(&config.jsonwebtoken.public_keyfile)?;

    let keys = KeyPair::from_rsa_pem(private_key, public_key)?;

    let container = Arc::new(
        Container::new(
            Arc::new(JwtTokenizer::new(keys)),
            Arc::new(SystemTimer),
            config.session.token_valid_duration(),
        )
        .with_issuer_key(config.session.issuer_key.clone()),
    );

    if container.issuer_key.is_none() {
        tracing::warn!("no issuer key configured, token issuance is disabled");
    }

    tracing::info!(
        host = %config.service.host,
        port = config.service.port,
        token_valid_seconds = config.session.token_valid_seconds,
        "starting server"
    );

    HttpServer::new(move || app::create(Arc::clone(&container)))
        .bind((config.service.host.as_str(), config.service.port))?
        .run()
        .await?;

    telemetry::shutdown(provider)?;

    Ok(())
}

#[actix_web::main]
async fn main() {
    if let Err(err) = run().await {
        panic!("{err}");
    }
}

fn read_key(keyfile: &str) -> Result<Vec<u8>, AppError> {
    fs::read(keyfile).map_err(|err| AppError::ReadKey(err.to_string(), keyfile.to_string()))
}
