use crate::api::{ApiResult, AUTHORIZATION_COOKIE};
use crate::api::dto::user::{AccessTokenDTO, IssueTokenDTO, SessionDTO, UserDTO};
use crate::api::middlewares::auth::{RequireIssuer, RequireUser, get_tokens};
use crate::domain::error::AppError;
use crate::services::authenticator::Authenticator;

use actix_web::{
    HttpRequest, HttpResponse,
    cookie::time::Duration,
    cookie::{Cookie, SameSite},
    get, post,
    web::{Data as State, Json},
};

use utoipa_actix_web::service_config::ServiceConfig;
use validator::Validate;

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(issue_token).service(session).service(viewer);
}

/// Mints a session token for a user the upstream sign-in step has verified.
///
/// Only callers holding the issuer key may mint.
#[utoipa::path(
    responses(
        (status = 200, body = AccessTokenDTO),
        (status = 400, body = AppError, example = json!(AppError::example_400())),
        (status = 401, body = AppError, example = json!(AppError::Unauthorized())),
        (status = 422, body = AppError, example = json!(AppError::example_422())),
        (status = 500, body = AppError, example = json!(AppError::example_500()))
    ),
    request_body = IssueTokenDTO,
    security(("issuer_key" = [])),
    tag = "Session",
)]
#[post("/tokens")]
pub async fn issue_token(
    _: RequireIssuer,
    payload: Json<IssueTokenDTO>,
    authenticator: State<Authenticator>,
) -> ApiResult {
    let user_dto = payload.into_inner();
    user_dto.validate()?;

    let token = authenticator.generate_token(&user_dto.into())?;

    let cookie = Cookie::build(AUTHORIZATION_COOKIE, token.clone())
        .http_only(true)
        .secure(true)
        .path("/api")
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(
            authenticator.token_valid_duration().num_seconds(),
        ))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AccessTokenDTO { token }))
}

#[utoipa::path(
    responses(
        (status = 200, body = SessionDTO)
    ),
    security((), ("bearer" = []), ("cookie" = [])),
    tag = "Session",
)]
#[get("/session")]
pub async fn session(req: HttpRequest, authenticator: State<Authenticator>) -> ApiResult {
    let signed_in = get_tokens(&req)
        .iter()
        .any(|token| authenticator.is_signed_in(token));

    Ok(HttpResponse::Ok().json(SessionDTO { signed_in }))
}

#[utoipa::path(
    responses(
        (status = 200, body = UserDTO),
        (status = 401, body = AppError, example = json!(AppError::example_401()))
    ),
    security(("bearer" = []), ("cookie" = [])),
    tag = "Session",
)]
#[get("/viewer")]
pub async fn viewer(require: RequireUser) -> ApiResult {
    Ok(HttpResponse::Ok().json(UserDTO::from(require.user)))
}
