// Error handling module for the Wayne API
// Provides centralized error types and HTTP response conversion

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All handlers return Result<T, ApiError>
///
/// Each variant maps to a specific HTTP status code and error response format.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures from the validator crate
    /// Maps to HTTP 422 Unprocessable Entity
    ValidationError(validator::ValidationErrors),

    /// Body, form or query string could not be decoded
    /// Maps to HTTP 422 Unprocessable Entity
    MalformedRequest(String),

    /// Missing, invalid or expired token, or bad credentials
    /// Maps to HTTP 401 Unauthorized
    Unauthorized(String),

    /// Authenticated, but not allowed to perform the operation
    /// Maps to HTTP 403 Forbidden
    Forbidden(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Duplicate resource conflict
    /// Maps to HTTP 400 Bad Request, which is what existing clients expect
    Conflict { message: String },

    /// Database operation errors
    /// Maps to HTTP 500, details are never sent to the client
    DatabaseError(sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500, details are never sent to the client
    InternalError(String),
}

/// Consistent error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub detail: String,

    /// Field-level validation errors, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, detail: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            detail: detail.into(),
            errors: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Shorthand for a not-found error on a named resource
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity: error! for 500s, warn! for
    /// security-relevant rejections, debug! for ordinary client mistakes.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut body = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed");
                body.errors = Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({})));
                (status, body)
            }
            ApiError::MalformedRequest(message) => {
                debug!("Malformed request: {}", message);
                (status, ErrorResponse::new("VALIDATION_ERROR", message.clone()))
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                (status, ErrorResponse::new("UNAUTHORIZED", message.clone()))
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                (status, ErrorResponse::new("FORBIDDEN", message.clone()))
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    status,
                    ErrorResponse::new("NOT_FOUND", format!("{} not found", resource)),
                )
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                (status, ErrorResponse::new("CONFLICT", message.clone()))
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                (
                    status,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    status,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"),
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}
