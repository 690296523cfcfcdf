// Authentication and authorization error types

use thiserror::Error;

use crate::error::ApiError;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token verified, but its subject no longer resolves to a user
    #[error("Unknown token subject")]
    UnknownSubject,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyExists,

    // Authorization errors
    /// Authenticated user lacks the admin flag
    #[error("Operation not permitted")]
    AdminRequired { user_id: i32 },

    // Internal failures
    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Every way of failing authentication looks the same to the client
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UnknownSubject => ApiError::Unauthorized("Access denied".to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::EmailAlreadyExists => ApiError::Conflict {
                message: err.to_string(),
            },
            AuthError::AdminRequired { user_id } => {
                tracing::debug!("User {} attempted an admin-only operation", user_id);
                ApiError::Forbidden(err.to_string())
            }
            AuthError::DatabaseError(e) => ApiError::DatabaseError(e),
            AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_)
            | AuthError::Internal(_) => ApiError::InternalError(err.to_string()),
        }
    }
}
