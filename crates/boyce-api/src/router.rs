//! Route definitions for the Boyce HTTP process.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Layer order, outermost first: tracing, proxy-header resolution, request
/// logging. Logging therefore sees the resolved client address.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/config", get(handlers::config::show_config))
        .route("/logs", get(handlers::logs::generate_logs))
        .fallback(handlers::fallback::not_found)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::proxy::forwarded_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
