// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/security-feeds  (envelope contract for UI consumers)
// - OPTIONS preflight        (CORS answered independently of the handler)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use secfeed_aggregator::{api, AppState, Fetch, FeedsConfig};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

struct MapFetcher(HashMap<String, String>);

#[async_trait]
impl Fetch for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        self.0.get(url).cloned()
    }
}

/// Build the same Router the binary uses, with every upstream down.
fn test_router() -> Router {
    let state = AppState {
        fetcher: Arc::new(MapFetcher(HashMap::new())),
        config: Arc::new(FeedsConfig::default()),
    };
    api::create_router(state)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_feeds_returns_the_envelope_contract() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/api/security-feeds")
        .body(Body::empty())
        .expect("build GET /api/security-feeds");

    let resp = app.oneshot(req).await.expect("oneshot /api/security-feeds");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse envelope json");

    // Contract checks for UI consumers
    assert_eq!(v["success"], true);
    assert!(v.get("timestamp").and_then(Json::as_str).is_some());

    let data = v.get("data").expect("missing 'data'");
    for key in ["nis2", "threat", "cve", "epss"] {
        let arr = data.get(key).and_then(Json::as_array).expect(key);
        assert!(!arr.is_empty(), "'{key}' must never be empty");
    }

    // outage run: epss is the static dataset, camelCase on the wire
    let epss0 = &data["epss"][0];
    assert_eq!(epss0["cveIdentifier"], "CVE-2016-10033");
    assert_eq!(epss0["cvssScore"], 9.8);
    assert_eq!(epss0["severity"], "CRITICAL");

    // nis2 items never expose a severity field
    assert!(data["nis2"][0].get("severity").is_none());
}

#[tokio::test]
async fn api_preflight_is_answered_with_cors_headers() {
    let app = test_router();

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/security-feeds")
        .header("Origin", "https://dashboard.example.test")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .expect("build OPTIONS preflight");

    let resp = app.oneshot(req).await.expect("oneshot preflight");
    assert!(
        resp.status().is_success(),
        "preflight should be 2xx, got {}",
        resp.status()
    );
    assert!(
        resp.headers().contains_key("access-control-allow-origin"),
        "preflight must carry permissive CORS headers"
    );
}
