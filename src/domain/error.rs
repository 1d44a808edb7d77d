use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header::ContentType},
    web::Json,
};

use actix_web::error::JsonPayloadError;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use serde_json::{Map, Value, to_string};

pub type AuthResult<T> = core::result::Result<T, AuthError>;

pub type AppResult<T> = core::result::Result<T, AppError>;

/// Failures of token issuance and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token cannot be decoded: {0}")]
    TokenDecode(String),
    #[error("token cannot be encoded: {0}")]
    TokenEncode(String),
    #[error("token is missing the `{0}` claim")]
    MissingClaim(String),
    #[error("claim `{claim}` has an invalid format: {reason}")]
    InvalidClaimFormat { claim: String, reason: String },
    #[error("payload conversion failed: {0}")]
    PayloadConversion(String),
    #[error("token expired")]
    TokenExpired,
}

macro_rules! static_error {
    ($name:ident, $status:expr) => {
        #[allow(non_snake_case, missing_docs)]
        pub fn $name(message: impl ToString) -> AppError {
            AppError {
                message: message.to_string(),
                code: $status.as_u16(),
                trace: None,
            }
        }
    };

    ($name:ident, $status:expr, $default:expr) => {
        #[allow(non_snake_case, missing_docs)]
        pub fn $name() -> AppError {
            AppError {
                message: $default.to_string(),
                code: $status.as_u16(),
                trace: None,
            }
        }
    };
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppError {
    pub message: String,
    pub code: u16,
    #[serde(skip)]
    pub trace: Option<String>,
}

#[rustfmt::skip]
pub mod message {
    pub static UNAUTHORIZED: &str = "The request was not successful because it lacks valid authentication credentials";
    pub static INVALID_TOKEN: &str = "The presented token is invalid";
    pub static SESSION_EXPIRED: &str = "The session has expired, sign in again";
    pub static UNPROCESSABLE_ENTITY: &str = "The server was unable to process the request because it contains invalid data";
    pub static BAD_REQUEST: &str = "The server would not process the request due to something the server considered to be a client error";
    pub static INTERNAL_ERROR: &str = "The server encountered an unexpected condition that prevented it from fulfilling the request";
}

#[rustfmt::skip]
impl AppError {
    // 1. Errors with Custom Message
    static_error!(BadRequest, StatusCode::BAD_REQUEST);
    static_error!(UnprocessableEntity, StatusCode::UNPROCESSABLE_ENTITY);

    // 2. Errors with Default Message
    static_error!(Unauthorized, StatusCode::UNAUTHORIZED, message::UNAUTHORIZED);
    static_error!(InvalidToken, StatusCode::UNAUTHORIZED, message::INVALID_TOKEN);
    static_error!(SessionExpired, StatusCode::UNAUTHORIZED, message::SESSION_EXPIRED);
    static_error!(InternalError, StatusCode::INTERNAL_SERVER_ERROR, message::INTERNAL_ERROR);

    pub fn trace(self, message: &str) -> AppError {
        AppError {
            code: self.code,
            message: self.message,
            trace: Some(message.to_owned()),
        }
    }

    pub fn example_500() -> AppError {
        AppError::InternalError()
    }

    pub fn example_401() -> AppError {
        AppError::InvalidToken()
    }

    pub fn example_422() -> AppError {
        AppError::UnprocessableEntity(message::UNPROCESSABLE_ENTITY)
    }

    pub fn example_400() -> AppError {
        AppError::BadRequest(message::BAD_REQUEST)
    }
}

impl std::error::Error for AppError {}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {}: {}", self.code, self.message)
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .json(Json(self))
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenExpired => AppError::SessionExpired(),
            AuthError::TokenEncode(_) => AppError::InternalError().trace(&error.to_string()),
            AuthError::TokenDecode(_)
            | AuthError::MissingClaim(_)
            | AuthError::InvalidClaimFormat { .. }
            | AuthError::PayloadConversion(_) => AppError::InvalidToken().trace(&error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut map = Map::new();

        for (_, field, error) in flatten_errors(&errors, None, None) {
            map.insert(field, Value::String(error.to_string()));
        }

        match to_string(&map) {
            Ok(message) => AppError::UnprocessableEntity(message),
            Err(error) => AppError::InternalError().trace(&error.to_string()),
        }
    }
}

fn flatten_errors(
    errors: &ValidationErrors,
    path: Option<String>,
    indent: Option<u16>,
) -> Vec<(u16, String, &ValidationError)> {
    errors
        .errors()
        .iter()
        .flat_map(|(field, err)| {
            let indent = indent.unwrap_or(0);
            let actual_path = path
                .as_ref()
                .map(|path| [path.as_str(), field].join("."))
                .unwrap_or_else(|| field.to_string());
            match err {
                ValidationErrorsKind::Field(field_errors) => field_errors
                    .iter()
                    .map(|error| (indent, actual_path.clone(), error))
                    .collect::<Vec<_>>(),
                ValidationErrorsKind::List(list_error) => list_error
                    .iter()
                    .flat_map(|(index, errors)| {
                        let actual_path = format!("{}[{}]", actual_path.as_str(), index);
                        flatten_errors(errors, Some(actual_path), Some(indent + 1))
                    })
                    .collect::<Vec<_>>(),
                ValidationErrorsKind::Struct(struct_errors) => {
                    flatten_errors(struct_errors, Some(actual_path), Some(indent + 1))
                }
            }
        })
        .collect::<Vec<_>>()
}

impl From<JsonPayloadError> for AppError {
    fn from(error: JsonPayloadError) -> Self {
        AppError::BadRequest(error.to_string())
    }
}
