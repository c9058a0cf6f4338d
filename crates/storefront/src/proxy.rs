//! Development proxy.
//!
//! Serves `/api/{*path}` and forwards each request to the backend origin with
//! the `/api` prefix stripped, so a local client can talk to the backend
//! without cross-origin setup.

use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, Uri, header},
    response::Response,
    routing::{any, get},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::{Span, debug};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::middleware::request_id_middleware;

/// Prefix the proxy strips before forwarding.
pub const API_PREFIX: &str = "/api";

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers that describe a single connection and must not be forwarded.
static HOP_BY_HOP: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

/// Shared state for the proxy handlers.
#[derive(Clone, Debug)]
pub struct ProxyState {
    client: reqwest::Client,
    origin: Url,
}

impl ProxyState {
    /// Create proxy state forwarding to `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(origin: Url) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, origin })
    }

    /// Create proxy state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> std::result::Result<Self, reqwest::Error> {
        Self::new(config.backend_origin.clone())
    }

    #[must_use]
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    /// Map an incoming `/api/...` URI onto the backend origin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the path is outside the prefix.
    pub fn upstream_url(&self, uri: &Uri) -> Result<Url> {
        let path = uri
            .path()
            .strip_prefix(API_PREFIX)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| AppError::BadRequest(format!("Not a proxied path: {}", uri.path())))?;

        let mut target = self.origin.clone();
        target.set_path(if path.is_empty() { "/" } else { path });
        target.set_query(uri.query());
        Ok(target)
    }
}

/// Router for the dev proxy, without Sentry layers.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/{*path}", any(forward))
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "proxy_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(CorsLayer::permissive())
}

/// Liveness check.
async fn health() -> &'static str {
    "ok"
}

/// Forward one request to the backend and relay its response.
async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let target = state.upstream_url(&uri)?;
    debug!(%method, %target, "Forwarding");

    let upstream = state
        .client
        .request(method, target)
        .headers(forwardable(&headers))
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let response_headers = forwardable(upstream.headers());
    let bytes = upstream.bytes().await?;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    response.headers_mut().extend(response_headers);
    Ok(response)
}

/// Copy `headers` without hop-by-hop entries or the length, which is
/// recomputed for the relayed body.
fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    headers
        .iter()
        .filter(|(name, _)| {
            !HOP_BY_HOP.contains(*name)
                && **name != header::CONTENT_LENGTH
                && name.as_str() != "keep-alive"
                && !connection_listed.iter().any(|listed| listed == name.as_str())
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn state() -> ProxyState {
        ProxyState::new(Url::parse("http://localhost:5000").unwrap()).unwrap()
    }

    #[test]
    fn test_upstream_url_strips_prefix_and_keeps_query() {
        let uri: Uri = "/api/v1/my-payments?page=2&sort=desc".parse().unwrap();
        let target = state().upstream_url(&uri).unwrap();
        assert_eq!(
            target.as_str(),
            "http://localhost:5000/v1/my-payments?page=2&sort=desc"
        );
    }

    #[test]
    fn test_upstream_url_rejects_lookalike_prefix() {
        let uri: Uri = "/apiv1/payments".parse().unwrap();
        assert!(matches!(
            state().upstream_url(&uri),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_forwardable_drops_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:5173"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-debug"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-debug", HeaderValue::from_static("1"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let kept = forwardable(&headers);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get(header::AUTHORIZATION).unwrap(), "Bearer t");
        assert_eq!(kept.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }
}
