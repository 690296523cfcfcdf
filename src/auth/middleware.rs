// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::app::AppState;
use crate::auth::{error::AuthError, models::User};
use crate::error::ApiError;

/// Authenticated user extractor for protected routes
///
/// Resolves the bearer token to a stored user. If `require_auth` already
/// ran for this request the user it attached is reused.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Like `CurrentUser`, but additionally requires the admin flag
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// The single authorization predicate for write operations
pub fn require_admin(user: &User) -> Result<(), AuthError> {
    if user.admin {
        Ok(())
    } else {
        Err(AuthError::AdminRequired { user_id: user.id })
    }
}

fn authorization_header(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AuthError::InvalidToken)
        })
        .transpose()
}

async fn resolve_user(
    state: &AppState,
    authorization: Option<String>,
    path: &str,
) -> Result<User, AuthError> {
    state
        .auth
        .authenticate(authorization.as_deref())
        .await
        .map_err(|e| {
            debug!("Authentication failed for {}: {}", path, e);
            e
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        let authorization = authorization_header(&parts.headers)?;
        let path = parts.uri.path().to_string();
        let user = resolve_user(&app_state, authorization, &path).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_admin(&user)?;
        Ok(AdminUser(user))
    }
}

/// Router-level guard: rejects unauthenticated requests before routing
/// reaches a handler and stores the resolved user in request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    let authorization = authorization_header(request.headers())?;
    let user = resolve_user(&state, authorization, &path).await?;

    debug!("Authenticated user {} for {}", user.id, path);
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}
