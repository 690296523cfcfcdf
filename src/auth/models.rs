// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_not_blank;

/// The only token type the API hands out
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// User database model
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
}

/// Fields needed to insert a user; the id is generated by the store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub admin: bool,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Bruce Wayne")]
    pub name: String,
    #[schema(example = "bruce@wayne.com")]
    pub email: String,
    #[schema(example = true)]
    pub admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            admin: user.admin,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom = "validate_not_blank")]
    #[schema(example = "Bruce Wayne")]
    pub name: String,
    #[validate(email)]
    #[schema(example = "bruce@wayne.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    #[schema(example = "i-am-batman")]
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

/// Login request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "bruce@wayne.com")]
    pub email: String,
    #[schema(example = "i-am-batman")]
    pub password: String,
}

/// OAuth2 password grant form, as sent by Swagger-style clients
///
/// `username` carries the email address. The remaining OAuth2 fields are
/// accepted and ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[validate(custom = "validate_not_blank")]
    pub username: String,
    pub password: String,
    pub grant_type: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Login response DTO carrying both tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl TokenPairResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// Response DTO carrying only an access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl AccessTokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "user created successfully")]
    pub message: String,
}
