//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use auth::{PgAuthRepository, RefreshTokenLedger, auth_router};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[derive(Clone)]
struct AdminState {
    repo: PgAuthRepository,
    dev: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool);

    // Startup cleanup: remove expired refresh tokens
    // Errors here should not prevent server startup
    let ledger = RefreshTokenLedger::from_config(Arc::new(repo.clone()), &config.auth);
    if let Err(e) = ledger.purge_expired().await {
        tracing::warn!(
            error = %e,
            "Refresh token cleanup failed, continuing anyway"
        );
    }

    let admin = Router::new()
        .route("/admin/reset", post(reset))
        .with_state(AdminState {
            repo: repo.clone(),
            dev: config.is_dev(),
        });

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(admin)
        .merge(auth_router(repo, config.auth));

    // Build router
    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(platform = %config.platform, "Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/healthz
async fn healthz() -> &'static str {
    "OK"
}

/// POST /api/admin/reset
async fn reset(State(state): State<AdminState>) -> Response {
    if !state.dev {
        return AppError::forbidden("Reset is only allowed in dev environment").into_response();
    }

    match state.repo.reset().await {
        Ok(()) => (StatusCode::OK, "Reset OK").into_response(),
        Err(e) => e.into_response(),
    }
}
