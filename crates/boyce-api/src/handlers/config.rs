//! Configuration inspection handler.

use axum::Json;
use axum::extract::State;

use boyce_core::config::SafeConfig;

use crate::state::AppState;

/// GET /config
///
/// Only the fields in [`SafeConfig`] are returned; secrets and connection
/// URLs never leave the process.
pub async fn show_config(State(state): State<AppState>) -> Json<SafeConfig> {
    Json(state.config.safe_view())
}
