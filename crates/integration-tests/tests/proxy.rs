//! Integration tests for the dev proxy.
//!
//! The proxy runs on its own ephemeral port in front of the mock backend.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use axum::Router;
use bazaar_integration_tests::{MockBackend, TEST_TOKEN};
use bazaar_storefront::api::PaymentsApi;
use bazaar_storefront::middleware::REQUEST_ID_HEADER;
use bazaar_storefront::proxy::{self, ProxyState};
use bazaar_storefront::{ApiClient, TokenStore};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn proxy_for(origin: Url) -> String {
    let addr = serve(proxy::router(ProxyState::new(origin).unwrap())).await;
    format!("http://{addr}")
}

// =============================================================================
// Forwarding
// =============================================================================

#[tokio::test]
async fn test_health() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::get(format!("{proxy}/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_strips_prefix_and_keeps_query_and_auth() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::Client::new()
        .get(format!("{proxy}/api/echo/items?page=2"))
        .bearer_auth("abc")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-upstream"], "mock-backend");
    let request_id = resp.headers()[REQUEST_ID_HEADER]
        .to_str()
        .unwrap()
        .to_string();
    assert!(!request_id.is_empty());

    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed["method"], "GET");
    assert_eq!(echoed["path"], "/echo/items");
    assert_eq!(echoed["query"], "page=2");
    assert_eq!(echoed["authorization"], "Bearer abc");
    assert_eq!(echoed["requestId"], request_id.as_str());
}

#[tokio::test]
async fn test_keeps_caller_request_id() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::Client::new()
        .get(format!("{proxy}/api/echo/trace"))
        .header(REQUEST_ID_HEADER, "req-123")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()[REQUEST_ID_HEADER], "req-123");
    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed["requestId"], "req-123");
}

#[tokio::test]
async fn test_forwards_method_and_body() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::Client::new()
        .post(format!("{proxy}/api/echo/submit"))
        .body("hello backend")
        .send()
        .await
        .unwrap();

    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["body"], "hello backend");
}

#[tokio::test]
async fn test_relays_backend_status_and_body() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::get(format!("{proxy}/api/api/v1/my-payments"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authorized, no token");
}

#[tokio::test]
async fn test_api_client_through_proxy() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let base: Url = format!("{proxy}/api/api/v1/").parse().unwrap();
    let client = ApiClient::new(base, TokenStore::with_token(TEST_TOKEN)).unwrap();

    let payments = client.my_payments().await.unwrap();
    assert!(payments.is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    // Bind and release a port so nothing is listening on it
    let closed = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let proxy = proxy_for(format!("http://{closed}").parse().unwrap()).await;

    let resp = reqwest::get(format!("{proxy}/api/anything")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(resp.text().await.unwrap(), "Backend unavailable");
}

#[tokio::test]
async fn test_paths_outside_prefix_are_not_served() {
    let backend = MockBackend::start().await;
    let proxy = proxy_for(backend.origin()).await;

    let resp = reqwest::get(format!("{proxy}/apiv1/payments")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
