//! Application builder and server entry point.

use std::net::SocketAddr;

use axum::Router;

use boyce_core::config::AppConfig;
use boyce_core::error::{AppError, ErrorKind};
use boyce_core::shutdown::shutdown_signal;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Binds the configured address and serves until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.bind_address, config.port);

    tracing::info!("Starting Boyce application on port {}", config.port);
    tracing::info!("Environment: {}", config.environment);
    tracing::debug!(config = ?config, "Loaded configuration");

    let app = build_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Io, format!("Failed to bind {addr}"), e)
    })?;

    tracing::info!("Boyce server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Io, "Server error", e))?;

    tracing::info!("Boyce server stopped");
    Ok(())
}
