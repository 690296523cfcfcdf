// HTTP handlers shared by every resource type

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::app::AppState;
use crate::auth::{AdminUser, CurrentUser};
use crate::error::ApiError;
use crate::query::Pagination;
use crate::resources::Resource;
use crate::validation::ValidatedJson;

/// Routes for one resource type: `PATH` for the collection, `PATH/:id` for
/// single records
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(R::PATH, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", R::PATH),
            get(get_one::<R>)
                .put(update::<R>)
                .patch(partial_update::<R>)
                .delete(delete::<R>),
        )
}

fn record_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    let Path(id) = path?;
    Ok(id)
}

/// Handler for POST /{resource}
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    ValidatedJson(fields): ValidatedJson<R::Fields>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let record = R::store(&state).insert(fields).await?;

    tracing::info!("User {} created {} {}", user.id, R::NAME, record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /{resource}
/// Returns one page wrapped in `{LIST_KEY: [...]}`
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<HashMap<&'static str, Vec<R>>>, ApiError> {
    let Query(page) = query?;
    page.validate()?;

    tracing::debug!(
        "User {} listing {} (offset {}, limit {})",
        user.id,
        R::NAME,
        page.offset,
        page.limit
    );

    let records = R::store(&state).list(page).await?;
    Ok(Json(HashMap::from([(R::LIST_KEY, records)])))
}

/// Handler for GET /{resource}/:id
pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<R>, ApiError> {
    let id = record_id(path)?;

    R::store(&state)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::NAME, id))
}

/// Handler for PUT /{resource}/:id
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    path: Result<Path<i32>, PathRejection>,
    ValidatedJson(fields): ValidatedJson<R::Fields>,
) -> Result<Json<R>, ApiError> {
    let id = record_id(path)?;

    let record = R::store(&state)
        .replace(id, fields)
        .await?
        .ok_or_else(|| ApiError::not_found(R::NAME, id))?;

    tracing::info!("User {} replaced {} {}", user.id, R::NAME, id);
    Ok(Json(record))
}

/// Handler for PATCH /{resource}/:id
/// Only the supplied fields change
pub async fn partial_update<R: Resource>(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    path: Result<Path<i32>, PathRejection>,
    ValidatedJson(patch): ValidatedJson<R::Patch>,
) -> Result<Json<R>, ApiError> {
    let id = record_id(path)?;

    let record = R::store(&state)
        .patch(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(R::NAME, id))?;

    tracing::info!("User {} patched {} {}", user.id, R::NAME, id);
    Ok(Json(record))
}

/// Handler for DELETE /{resource}/:id
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(path)?;

    if !R::store(&state).delete(id).await? {
        return Err(ApiError::not_found(R::NAME, id));
    }

    tracing::info!("User {} deleted {} {}", user.id, R::NAME, id);
    Ok(StatusCode::NO_CONTENT)
}
