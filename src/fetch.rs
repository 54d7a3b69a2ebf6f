// src/fetch.rs
// Bounded single-shot HTTP fetcher. Every failure mode (transport error,
// timeout, non-2xx) collapses to `None`; retry policy, if any, belongs to the
// calling pipeline.

use async_trait::async_trait;
use metrics::counter;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// The scraped portals serve different markup to obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_HINT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Seam between the pipelines and the network. Tests inject fixture-backed
/// implementations; production uses [`HttpFetcher`].
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Body text on a 2xx response, `None` otherwise.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS, BROWSER_USER_AGENT)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        let resp = match self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HINT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = ?e, url, "fetch transport error");
                counter!("feeds_fetch_errors_total").increment(1);
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), url, "fetch non-success status");
            counter!("feeds_fetch_errors_total").increment(1);
            return None;
        }

        match resp.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(error = ?e, url, "fetch body read error");
                counter!("feeds_fetch_errors_total").increment(1);
                None
            }
        }
    }
}
