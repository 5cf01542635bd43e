//! Fallback for unmatched routes.

use axum::http::{Method, Uri};

use boyce_core::error::AppError;

use crate::error::ApiError;

/// Any route not in the router.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    AppError::not_found(format!("No route for {} {}", method, uri.path())).into()
}
