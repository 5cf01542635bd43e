//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use super::proxy::ForwardedInfo;

/// Logs each request with its resolved client address, scheme, and mount
/// prefix alongside status and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let info = request
        .extensions()
        .get::<ForwardedInfo>()
        .cloned()
        .unwrap_or_default();
    let client = info.client_addr.as_deref().unwrap_or("-");
    let proto = info.proto.as_deref().unwrap_or("-");
    let prefix = info.prefix.as_deref().unwrap_or("");
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        client = %client,
        proto = %proto,
        prefix = %prefix,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}
