//! Reverse-proxy header handling.
//!
//! The process is expected to run behind a fixed number of trusted proxies.
//! For each `X-Forwarded-*` header the entry appended by the outermost
//! trusted proxy is taken, i.e. the value `hops` positions from the end of
//! the comma-separated list. Headers with fewer entries than `hops` are
//! ignored.
//!
//! The resolved values are stored as a [`ForwardedInfo`] request extension,
//! readable by handlers through `Extension<ForwardedInfo>`; the request log
//! line records all of them.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PREFIX: &str = "x-forwarded-prefix";

/// Client-facing request details resolved from proxy headers.
///
/// Inserted into request extensions by [`forwarded_headers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedInfo {
    /// Original client address.
    pub client_addr: Option<String>,
    /// Original scheme (`http` / `https`).
    pub proto: Option<String>,
    /// Original `Host`.
    pub host: Option<String>,
    /// Path prefix the application is mounted under, without trailing `/`.
    pub prefix: Option<String>,
}

impl ForwardedInfo {
    /// Resolve forwarded values from request headers.
    pub fn from_headers(headers: &HeaderMap, hops: usize) -> Self {
        Self {
            client_addr: trusted_value(headers, X_FORWARDED_FOR, hops),
            proto: trusted_value(headers, X_FORWARDED_PROTO, hops),
            host: trusted_value(headers, X_FORWARDED_HOST, hops),
            prefix: trusted_value(headers, X_FORWARDED_PREFIX, hops)
                .map(|p| p.trim_end_matches('/').to_string()),
        }
    }
}

fn trusted_value(headers: &HeaderMap, name: &str, hops: usize) -> Option<String> {
    if hops == 0 {
        return None;
    }

    let joined = headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");

    let values: Vec<&str> = joined.split(',').map(str::trim).collect();
    if values.len() < hops {
        return None;
    }

    let value = values[values.len() - hops];
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolves [`ForwardedInfo`] for every request and rewrites `Host` when a
/// trusted `X-Forwarded-Host` is present.
pub async fn forwarded_headers(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut info = ForwardedInfo::from_headers(request.headers(), state.config.proxy_trusted_hops);

    if info.client_addr.is_none() {
        info.client_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
    }

    if let Some(host) = &info.host {
        match HeaderValue::from_str(host) {
            Ok(value) => {
                request.headers_mut().insert(header::HOST, value);
            }
            Err(_) => tracing::debug!(host = %host, "Ignoring invalid X-Forwarded-Host"),
        }
    }

    request.extensions_mut().insert(info);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_single_hop_takes_last_entry() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.2")]);
        let info = ForwardedInfo::from_headers(&h, 1);
        assert_eq!(info.client_addr.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_two_hops_take_second_from_end() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.2")]);
        let info = ForwardedInfo::from_headers(&h, 2);
        assert_eq!(info.client_addr.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_too_few_entries_is_ignored() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7")]);
        let info = ForwardedInfo::from_headers(&h, 2);
        assert_eq!(info.client_addr, None);
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-forwarded-for", "10.0.0.2"),
        ]);
        let info = ForwardedInfo::from_headers(&h, 1);
        assert_eq!(info.client_addr.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_proto_host_and_prefix() {
        let h = headers(&[
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "app.example.com"),
            ("x-forwarded-prefix", "/boyce/"),
        ]);
        let info = ForwardedInfo::from_headers(&h, 1);
        assert_eq!(info.proto.as_deref(), Some("https"));
        assert_eq!(info.host.as_deref(), Some("app.example.com"));
        assert_eq!(info.prefix.as_deref(), Some("/boyce"));
    }

    #[test]
    fn test_zero_hops_trusts_nothing() {
        let h = headers(&[("x-forwarded-for", "203.0.113.7")]);
        assert_eq!(ForwardedInfo::from_headers(&h, 0), ForwardedInfo::default());
    }

    mod layered {
        use std::net::SocketAddr;

        use axum::body::{Body, to_bytes};
        use axum::extract::{ConnectInfo, Extension};
        use axum::http::{HeaderMap, Request, header};
        use axum::routing::get;
        use axum::{Json, Router, middleware as axum_middleware};
        use serde_json::{Value, json};
        use tower::ServiceExt;

        use boyce_core::config::AppConfig;

        use super::super::{ForwardedInfo, forwarded_headers};
        use crate::state::AppState;

        async fn echo(headers: HeaderMap, Extension(info): Extension<ForwardedInfo>) -> Json<Value> {
            Json(json!({
                "host": headers.get(header::HOST).and_then(|v| v.to_str().ok()),
                "client": info.client_addr,
                "proto": info.proto,
                "prefix": info.prefix,
            }))
        }

        fn router(hops: &str) -> Router {
            let config = AppConfig::from_env_map([("PROXY_TRUSTED_HOPS", hops)]).unwrap();
            let state = AppState::new(config);
            Router::new()
                .route("/", get(echo))
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    forwarded_headers,
                ))
                .with_state(state)
        }

        async fn send(router: Router, headers: &[(&str, &str)]) -> Value {
            let mut builder = Request::builder().uri("/").header(header::HOST, "localhost");
            for (name, value) in headers {
                builder = builder.header(*name, *value);
            }
            let mut request = builder.body(Body::empty()).unwrap();
            let peer: SocketAddr = "192.0.2.10:5555".parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(peer));

            let response = router.oneshot(request).await.unwrap();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            serde_json::from_slice(&bytes).unwrap()
        }

        const PROXY_HEADERS: [(&str, &str); 4] = [
            ("x-forwarded-for", "203.0.113.7"),
            ("x-forwarded-proto", "https"),
            ("x-forwarded-host", "app.example.com"),
            ("x-forwarded-prefix", "/boyce/"),
        ];

        #[tokio::test]
        async fn test_headers_resolved_and_host_rewritten() {
            let body = send(router("1"), &PROXY_HEADERS).await;
            assert_eq!(body["host"], "app.example.com");
            assert_eq!(body["client"], "203.0.113.7");
            assert_eq!(body["proto"], "https");
            assert_eq!(body["prefix"], "/boyce");
        }

        #[tokio::test]
        async fn test_peer_address_used_without_forwarded_for() {
            let body = send(router("1"), &[]).await;
            assert_eq!(body["host"], "localhost");
            assert_eq!(body["client"], "192.0.2.10");
            assert!(body["proto"].is_null());
        }

        #[tokio::test]
        async fn test_zero_trusted_hops_ignores_headers() {
            let body = send(router("0"), &PROXY_HEADERS).await;
            assert_eq!(body["host"], "localhost");
            assert_eq!(body["client"], "192.0.2.10");
            assert!(body["proto"].is_null());
            assert!(body["prefix"].is_null());
        }
    }

    #[test]
    fn test_missing_headers() {
        assert_eq!(
            ForwardedInfo::from_headers(&HeaderMap::new(), 1),
            ForwardedInfo::default()
        );
    }
}
