//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use boyce_core::config::AppConfig;

/// Application state passed to every Axum handler via `State<AppState>`.
///
/// Configuration is read-only after startup, so no locking is needed.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wrap a loaded configuration into shared state.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
