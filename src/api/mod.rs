use actix_web::{HttpResponse, web::JsonConfig};
use utoipa_actix_web::{scope, service_config::ServiceConfig};

use crate::domain::error::{AppError, AppResult};

mod controllers;
mod dto;
mod middlewares;

pub use middlewares::auth::{ISSUER_KEY_HEADER, IssuerKey};

pub const AUTHORIZATION_COOKIE: &str = "Authorization";

pub type ApiResult = AppResult<HttpResponse>;

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(scope("/api/v1").configure(controllers::session::routes));
}

/// JSON body limits, with rejections rendered as [`AppError`].
pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(32768)
        .content_type(|mime| mime == mime::APPLICATION_JSON)
        .content_type_required(true)
        .error_handler(|err, _| AppError::from(err).into())
}
