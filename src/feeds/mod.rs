// src/feeds/mod.rs
pub mod cve;
pub mod epss;
pub mod html;
pub mod nis2;
pub mod rss;
pub mod threat;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::config::FeedsConfig;
use crate::feeds::types::FeedData;
use crate::fetch::Fetch;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feeds_items_total", "Items extracted from live sources.");
        describe_counter!("feeds_fetch_errors_total", "Outbound fetch failures.");
        describe_counter!(
            "feeds_fallback_total",
            "Pipelines backfilled from static datasets."
        );
        describe_counter!(
            "feeds_threat_discovery_total",
            "Times the threat pipeline entered its discovery fallback."
        );
        describe_histogram!("feeds_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Run the four pipelines concurrently and assemble the response data.
///
/// This is a join, not a race: all four complete (successfully or not)
/// before assembly. A pipeline that comes back empty -- fetch failure, zero
/// extractable items, or a source that changed shape -- is backfilled from
/// its own static dataset, so no collection is ever empty.
pub async fn aggregate(fetcher: &dyn Fetch, cfg: &FeedsConfig) -> FeedData {
    ensure_metrics_described();

    let (nis2, threat, cve, epss) = tokio::join!(
        nis2::pipeline(fetcher, cfg),
        threat::pipeline(fetcher, cfg),
        cve::pipeline(fetcher, cfg),
        epss::pipeline(fetcher, cfg),
    );

    FeedData {
        nis2: or_fallback(nis2, nis2::fallback_items, "nis2"),
        threat: or_fallback(threat, threat::fallback_items, "threat"),
        cve: or_fallback(cve, cve::fallback_items, "cve"),
        epss: or_fallback(epss, epss::fallback_predictions, "epss"),
    }
}

fn or_fallback<T>(items: Vec<T>, fallback: fn() -> Vec<T>, category: &'static str) -> Vec<T> {
    if items.is_empty() {
        tracing::info!(category, "live pipeline empty, serving static dataset");
        counter!("feeds_fallback_total", "category" => category).increment(1);
        return fallback();
    }
    items
}
