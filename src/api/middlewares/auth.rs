use crate::api::AUTHORIZATION_COOKIE;
use crate::domain::error::AppError;
use crate::domain::models::user::User;
use crate::services::authenticator::Authenticator;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use constant_time_eq::constant_time_eq;
use futures::future::{Ready, err, ok};

pub const ISSUER_KEY_HEADER: &str = "x-issuer-key";

/// Resolves the signed in user, rejecting missing, invalid and expired tokens.
#[derive(Debug)]
pub struct RequireUser {
    pub user: User,
}

/// Admits only callers presenting the configured issuer key.
#[derive(Debug)]
pub struct RequireIssuer;

/// Shared secret guarding token issuance. Without one, issuance is closed.
#[derive(Debug, Clone, Default)]
pub struct IssuerKey(Option<String>);

impl IssuerKey {
    pub fn new(key: Option<String>) -> Self {
        IssuerKey(key.filter(|key| !key.is_empty()))
    }

    pub fn matches(&self, presented: &str) -> bool {
        self.0
            .as_deref()
            .is_some_and(|key| constant_time_eq(key.as_bytes(), presented.as_bytes()))
    }
}

/// Candidate tokens in the order they are tried: the `Authorization`
/// cookie, then the bearer header.
pub fn get_tokens(req: &HttpRequest) -> Vec<String> {
    let cookie = req
        .cookie(AUTHORIZATION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    cookie.into_iter().chain(bearer).collect()
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequest for RequireUser {
    type Error = AppError;
    type Future = Ready<Result<RequireUser, AppError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(authenticator) = req.app_data::<web::Data<Authenticator>>() else {
            return err(AppError::InternalError().trace("Authenticator is not defined"));
        };

        // The last failure wins, so an explicit bearer header decides the
        // error when both sources are rejected.
        let mut error = None;
        for token in get_tokens(req) {
            match authenticator.get_user(&token) {
                Ok(user) => return ok(RequireUser { user }),
                Err(rejected) => {
                    tracing::debug!(error = %rejected, "rejecting token");
                    error = Some(rejected);
                }
            }
        }

        match error {
            Some(error) => err(error.into()),
            None => err(AppError::Unauthorized()),
        }
    }
}

impl FromRequest for RequireIssuer {
    type Error = AppError;
    type Future = Ready<Result<RequireIssuer, AppError>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(issuer_key) = req.app_data::<web::Data<IssuerKey>>() else {
            return err(AppError::InternalError().trace("Issuer key is not defined"));
        };

        let presented = req
            .headers()
            .get(ISSUER_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        match presented {
            Some(presented) if issuer_key.matches(presented) => ok(RequireIssuer),
            _ => {
                tracing::warn!("rejecting token issuance without a valid issuer key");
                err(AppError::Unauthorized())
            }
        }
    }
}
