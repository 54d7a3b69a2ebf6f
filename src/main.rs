//! Security Feed Aggregator - Binary Entrypoint
//! Boots the Axum HTTP server, wiring the four scraping pipelines behind a
//! single aggregation endpoint.

mod api;
mod config;
mod dates;
mod feeds;
mod fetch;
mod metrics;
mod severity;
mod text;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::AppState;
use crate::config::FeedsConfig;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - FEEDS_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FEEDS_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("secfeed=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables the
    // FEEDS_* overrides so config.rs can pick them up.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = FeedsConfig::load_default().expect("Failed to load feeds config");

    // Prometheus recorder + /metrics, merged alongside the API routes.
    let prometheus = metrics::Metrics::init(cfg.timeout_secs);

    let state = AppState::from_config(cfg);
    let router = api::create_router(state).merge(prometheus.router());

    Ok(router.into())
}
