use std::process;

use tracing_subscriber::EnvFilter;

use wayne_api::{config::AppConfig, create_router, db, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Wayne API - Starting...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    tracing::info!("Connecting to database...");
    let pool = match db::create_pool(&config.database_url, config.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database pool: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        process::exit(1);
    }

    let app = create_router(AppState::new(pool, &config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            process::exit(1);
        }
    };

    tracing::info!("Wayne API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }

    tracing::info!("Wayne API stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving; without a signal handler only a kill stops us
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
