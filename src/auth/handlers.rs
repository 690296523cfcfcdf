// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::app::AppState;
use crate::auth::{
    middleware::CurrentUser,
    models::{
        AccessTokenResponse, LoginForm, LoginRequest, MessageResponse, RegisterRequest,
        TokenPairResponse, UserResponse,
    },
};
use crate::error::ApiError;
use crate::validation::{ValidatedForm, ValidatedJson};

/// Register a new user
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Invalid request body")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "user created successfully".to_string(),
        }),
    ))
}

/// Login with a JSON body
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPairResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let tokens = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(tokens))
}

/// Login with an OAuth2 password-grant form
/// POST /auth/login-form
#[utoipa::path(
    post,
    path = "/auth/login-form",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = AccessTokenResponse),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_form_handler(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let token = state.auth.login_form(&form.username, &form.password).await?;
    Ok(Json(token))
}

/// Exchange any valid token for a fresh access token
/// POST /auth/refresh
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let token = state.auth.refresh(&user)?;
    Ok(Json(token))
}

/// Get current user information (protected endpoint)
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
