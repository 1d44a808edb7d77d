use crate::api::dto::validation::{is_email, is_name, is_user_id};
use crate::domain::models::user::User;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDTO {
    id: String,
    name: String,
    email: String,
}

/// User whose identity the caller has already established.
#[derive(Debug, Validate, Deserialize, ToSchema)]
pub struct IssueTokenDTO {
    #[validate(custom(function = "is_user_id"))]
    #[schema(examples("alpha"))]
    pub id: String,

    #[serde(default)]
    #[validate(custom(function = "is_name"))]
    #[schema(examples("Alpha"))]
    pub name: String,

    #[validate(custom(function = "is_email"))]
    #[schema(examples("alpha@example.com"))]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenDTO {
    #[schema(examples("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9"))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDTO {
    pub signed_in: bool,
}

impl From<User> for UserDTO {
    fn from(val: User) -> Self {
        UserDTO {
            id: val.id,
            name: val.name,
            email: val.email,
        }
    }
}

impl From<IssueTokenDTO> for User {
    fn from(dto: IssueTokenDTO) -> Self {
        User {
            id: dto.id,
            name: dto.name,
            email: dto.email,
        }
    }
}
