// src/api.rs
// Public HTTP surface: the aggregator endpoint plus health. CORS is layered
// permissively so the dashboard UI (different origin) can consume the feeds,
// and preflight OPTIONS probes are answered without touching the handlers.

use std::sync::Arc;

use chrono::Utc;
use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::FeedsConfig;
use crate::feeds;
use crate::feeds::types::FeedData;
use crate::fetch::{Fetch, HttpFetcher};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetch>,
    pub config: Arc<FeedsConfig>,
}

impl AppState {
    /// Production state: a real HTTP fetcher configured from `cfg`.
    pub fn from_config(cfg: FeedsConfig) -> Self {
        let fetcher = HttpFetcher::new(cfg.timeout_secs, &cfg.user_agent);
        Self {
            fetcher: Arc::new(fetcher),
            config: Arc::new(cfg),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/security-feeds", get(security_feeds))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct FeedsEnvelope {
    success: bool,
    data: FeedData,
    timestamp: String,
}

#[derive(serde::Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

/// Aggregate the four pipelines and wrap the result.
///
/// The pipelines are non-throwing by contract, so the error envelope is
/// reserved for defects escaping that containment: the aggregation runs in
/// its own task and a panic surfaces here as the join error.
async fn security_feeds(State(state): State<AppState>) -> Response {
    let fetcher = state.fetcher.clone();
    let cfg = state.config.clone();

    let joined =
        tokio::spawn(async move { feeds::aggregate(fetcher.as_ref(), cfg.as_ref()).await }).await;

    match joined {
        Ok(data) => {
            let envelope = FeedsEnvelope {
                success: true,
                data,
                timestamp: Utc::now().to_rfc3339(),
            };
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(e) => {
            tracing::error!(error = ?e, "feed aggregation aborted");
            let envelope = ErrorEnvelope {
                success: false,
                error: "feed aggregation failed".to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
        }
    }
}
