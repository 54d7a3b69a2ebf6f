// tests/threat_fallback_chain.rs
//
// Ordering of the threat pipeline's degradation chain: primary RSS, then
// feeds discovered on the index page, then scraping the index page itself,
// then (at the orchestrator) the static dataset.

use std::collections::HashMap;

use async_trait::async_trait;

use secfeed_aggregator::feeds::threat;
use secfeed_aggregator::{aggregate, Fetch, FeedsConfig};

const ACN_INDEX: &str = include_str!("fixtures/acn_index.html");
const DISCOVERED_FEED: &str = include_str!("fixtures/discovered_feed.xml");

struct MapFetcher(HashMap<String, String>);

#[async_trait]
impl Fetch for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        self.0.get(url).cloned()
    }
}

// The single feed URL discoverable inside fixtures/acn_index.html once
// resolved against the ACN origin.
const DISCOVERED_URL: &str = "https://www.acn.gov.it/portale/feed/notizie.xml";

#[tokio::test]
async fn discovered_feed_wins_over_the_html_scrape() {
    let cfg = FeedsConfig::default();
    let mut map = HashMap::new();
    // primary CSIRT feed absent -> fetch fails
    map.insert(cfg.acn_index_url.clone(), ACN_INDEX.to_string());
    map.insert(DISCOVERED_URL.to_string(), DISCOVERED_FEED.to_string());
    let fetcher = MapFetcher(map);

    let data = aggregate(&fetcher, &cfg).await;

    assert_eq!(data.threat.len(), 2);
    assert!(data
        .threat
        .iter()
        .all(|i| i.url.starts_with("https://www.acn.gov.it/portale/notizie/")));
    assert_eq!(
        data.threat[0].title,
        "Pubblicato il rapporto annuale sulle minacce cyber"
    );
}

#[tokio::test]
async fn dead_discovered_feed_falls_back_to_scraping_the_index() {
    let cfg = FeedsConfig::default();
    let mut map = HashMap::new();
    // index reachable, but the feed it advertises is not
    map.insert(cfg.acn_index_url.clone(), ACN_INDEX.to_string());
    let fetcher = MapFetcher(map);

    let data = aggregate(&fetcher, &cfg).await;

    // two scrapeable articles; the LinkedIn self-promo block is excluded
    assert_eq!(data.threat.len(), 2);
    assert_eq!(
        data.threat[0].url,
        "https://www.acn.gov.it/portale/notizie/attacco-supply-chain"
    );
    assert_eq!(data.threat[0].date, "18 gennaio 2025");
    assert!(data.threat.iter().all(|i| i.severity.is_some()));
}

#[tokio::test]
async fn empty_chain_ends_at_the_static_dataset() {
    let cfg = FeedsConfig::default();
    let fetcher = MapFetcher(HashMap::new());

    let data = aggregate(&fetcher, &cfg).await;

    assert_eq!(data.threat, threat::fallback_items());
}
