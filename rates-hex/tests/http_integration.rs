//! Integration tests for the HTTP adapter.
//!
//! These tests drive the full stack: router, resolver, SQLite directory,
//! in-memory cache, and the NBRB client pointed at a wiremock server.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use rates_hex::{
    RateResolver,
    inbound::{HttpServer, RateLimiterState},
};
use rates_repo::{InMemoryRateCache, NbrbClient, SqliteRepo};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestServer = HttpServer<SqliteRepo, InMemoryRateCache, NbrbClient>;

const CURRENCIES: &str = r#"[
    {"Cur_ID":431,"Cur_Abbreviation":"USD","Cur_Name":"Доллар США","Cur_Name_Eng":"US Dollar","Cur_Scale":1,"Cur_DateEnd":"2050-01-01T00:00:00"},
    {"Cur_ID":451,"Cur_Abbreviation":"EUR","Cur_Name":"Евро","Cur_Name_Eng":"Euro","Cur_Scale":1,"Cur_DateEnd":"2050-01-01T00:00:00"}
]"#;

const USD_RATE: &str = r#"{"Cur_ID":431,"Date":"2024-06-01T00:00:00","Cur_Abbreviation":"USD","Cur_Scale":1,"Cur_Name":"Доллар США","Cur_OfficialRate":3.2014}"#;

/// Starts a mock NBRB API serving the currency list and the USD rate.
///
/// The USD rate endpoint expects exactly `rate_calls` requests.
async fn mock_nbrb(rate_calls: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/currencies"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rates/431"))
        .respond_with(ResponseTemplate::new(200).set_body_string(USD_RATE))
        .expect(rate_calls)
        .mount(&server)
        .await;

    server
}

/// Helper to create a test server backed by in-memory SQLite.
async fn create_test_server(nbrb: &MockServer, requests_per_minute: u32) -> TestServer {
    create_server_with_limiter(
        nbrb,
        RateLimiterState::new(requests_per_minute, Duration::from_secs(60)),
    )
    .await
}

async fn create_server_with_limiter(nbrb: &MockServer, limiter: RateLimiterState) -> TestServer {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = RateResolver::new(repo, InMemoryRateCache::default(), NbrbClient::new(nbrb.uri()));
    HttpServer::new(service, limiter)
}

/// Request arriving over a TCP connection from `peer`.
fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let peer: IpAddr = peer.parse().unwrap();
    let mut builder = Request::builder()
        .uri("/api/currencies")
        .extension(ConnectInfo(SocketAddr::new(peer, 40000)));
    if let Some(value) = forwarded_for {
        builder = builder.header("X-Forwarded-For", value);
    }
    builder.body(Body::empty()).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn sync_request() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/currencies/sync")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 100).await.router();

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_sync_then_list_currencies() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 100).await.router();

    let response = app.clone().oneshot(sync_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["synced"], 2);

    let response = app.clone().oneshot(get_request("/api/currencies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["abbreviation"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["EUR", "USD"]);

    let response = app.oneshot(get_request("/api/currencies/USD")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], 431);
}

#[tokio::test]
async fn test_resolve_rate_fetches_once_then_serves_from_cache() {
    // The rate endpoint must be hit exactly once across both requests.
    let nbrb = mock_nbrb(1).await;
    let app = create_test_server(&nbrb, 100).await.router();
    app.clone().oneshot(sync_request()).await.unwrap();

    for _ in 0..2 {
        let response = app.clone().oneshot(get_request("/api/rates/USD")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["abbreviation"], "USD");
        assert_eq!(json["currency_id"], 431);
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["official_rate"], "3.2014");
        assert_eq!(json["scale"], 1);
    }

    let response = app
        .oneshot(get_request("/api/currencies/USD/rates"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolve_rate_unknown_currency() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 100).await.router();

    let response = app.oneshot(get_request("/api/rates/XYZ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Currency not found for abbreviation: XYZ");
    assert_eq!(json["code"], 404);
}

#[tokio::test]
async fn test_resolve_rate_remote_failure_is_bad_gateway() {
    let nbrb = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/currencies"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
        .mount(&nbrb)
        .await;
    Mock::given(method("GET"))
        .and(path("/rates/431"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&nbrb)
        .await;

    let app = create_test_server(&nbrb, 100).await.router();
    app.clone().oneshot(sync_request()).await.unwrap();

    let response = app.oneshot(get_request("/api/rates/USD")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 100).await.router();

    let response = app
        .oneshot(get_request("/api-docs/openapi.json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/rates/{abbreviation}"].is_object());
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate limiting
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 3).await.router();

    for i in 1..=3 {
        let response = app.clone().oneshot(get_request("/api/currencies")).await.unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited (quota not yet exceeded)",
            i
        );
    }

    let response = app.oneshot(get_request("/api/currencies")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("Rate limit exceeded"));
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 1).await.router();

    for _ in 0..10 {
        let response = app.clone().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_client_isolation() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 1).await.router();

    let response = app.clone().oneshot(request_from("203.0.113.1", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(request_from("203.0.113.2", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Client B has its own quota");

    let response = app.oneshot(request_from("203.0.113.1", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limiting_ignores_forwarded_for_from_direct_clients() {
    let nbrb = mock_nbrb(0).await;
    let app = create_test_server(&nbrb, 1).await.router();

    let response = app
        .clone()
        .oneshot(request_from("203.0.113.1", Some("198.51.100.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A new header value does not buy a new quota
    let response = app
        .oneshot(request_from("203.0.113.1", Some("198.51.100.2")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limiting_keys_on_forwarded_for_behind_trusted_proxy() {
    let nbrb = mock_nbrb(0).await;
    let proxy: IpAddr = "10.0.0.1".parse().unwrap();
    let limiter =
        RateLimiterState::new(1, Duration::from_secs(60)).with_trusted_proxies(vec![proxy]);
    let app = create_server_with_limiter(&nbrb, limiter).await.router();

    let response = app
        .clone()
        .oneshot(request_from("10.0.0.1", Some("198.51.100.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request_from("10.0.0.1", Some("198.51.100.2")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Second client behind the proxy");

    let response = app
        .oneshot(request_from("10.0.0.1", Some("198.51.100.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
