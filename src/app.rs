// Application assembly: shared state, router and API documentation

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{self, require_auth, AuthService, TokenService, UserRepository};
use crate::config::AppConfig;
use crate::resources::{
    self, resource_routes, Equipment, EquipmentSafety, PgResourceStore, ResourceStore, Vehicle,
};

/// Application state shared across handlers
///
/// Stores sit behind trait objects so tests can swap in in-memory versions.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub vehicles: Arc<dyn ResourceStore<Vehicle>>,
    pub equipment: Arc<dyn ResourceStore<Equipment>>,
    pub equipment_safety: Arc<dyn ResourceStore<EquipmentSafety>>,
}

impl AppState {
    /// Wire the PostgreSQL-backed stores and the auth service together
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let users = Arc::new(UserRepository::new(pool.clone()));
        let tokens = TokenService::new(&config.jwt);

        Self {
            auth: AuthService::new(users, tokens),
            vehicles: Arc::new(PgResourceStore::<Vehicle>::new(pool.clone())),
            equipment: Arc::new(PgResourceStore::<Equipment>::new(pool.clone())),
            equipment_safety: Arc::new(PgResourceStore::<EquipmentSafety>::new(pool)),
        }
    }
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::login_form_handler,
        auth::handlers::refresh_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::LoginForm,
            auth::models::TokenPairResponse,
            auth::models::AccessTokenResponse,
            auth::models::MessageResponse,
            auth::models::UserResponse,
            resources::Vehicle,
            resources::vehicles::VehicleFields,
            resources::vehicles::VehiclePatch,
            resources::Equipment,
            resources::equipment::EquipmentFields,
            resources::equipment::EquipmentPatch,
            resources::EquipmentSafety,
            resources::equipment_safety::EquipmentSafetyFields,
            resources::equipment_safety::EquipmentSafetyPatch,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token endpoints"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Wayne API",
        version = "1.0.0",
        description = "Vehicles, equipment and equipment safety records behind JWT authentication"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Liveness probe
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Creates and configures the application router
///
/// Auth endpoints and `/health` are public (`/auth/refresh` and `/auth/me`
/// authenticate through their extractor). Every resource route sits behind
/// `require_auth`.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/login-form", post(auth::login_form_handler))
        .route("/refresh", post(auth::refresh_handler))
        .route("/me", get(auth::me_handler));

    let resource_api = Router::new()
        .merge(resource_routes::<Vehicle>())
        .merge(resource_routes::<Equipment>())
        .merge(resource_routes::<EquipmentSafety>())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_handler))
        .nest("/auth", auth_routes)
        .merge(resource_api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
