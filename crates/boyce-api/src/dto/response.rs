//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Current UTC time, RFC 3339.
    pub timestamp: DateTime<Utc>,
    /// Application version.
    pub version: String,
    /// Deployment environment name.
    pub environment: String,
}

/// Simple confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
