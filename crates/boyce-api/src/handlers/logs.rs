//! Sample log generation handler.

use axum::Json;

use crate::dto::response::MessageResponse;

/// GET /logs
pub async fn generate_logs() -> Json<MessageResponse> {
    tracing::info!("Info log generated via API");
    tracing::warn!("Warning log generated via API");
    tracing::error!("Error log generated via API");

    Json(MessageResponse {
        message: "Logs generated successfully".to_string(),
    })
}
