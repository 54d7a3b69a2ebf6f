// src/feeds/threat.rs
// Threat advisories pipeline. Primary source is the CSIRT Italia RSS feed;
// when that yields nothing the pipeline degrades through feed discovery on
// the ACN index page, and finally to scraping the index page itself.

use metrics::counter;

use crate::config::FeedsConfig;
use crate::dates;
use crate::feeds::html;
use crate::feeds::rss::{self, THREAT_PARAMS};
use crate::feeds::types::{Category, FeedItem};
use crate::fetch::Fetch;
use crate::severity::{classify, Severity};
use crate::text::normalize_text;

const DEFAULT_SEVERITY: Severity = Severity::Medium;

/// Discovery bounds: candidates attempted, early-stop yield, scrape cap.
const MAX_FEED_CANDIDATES: usize = 3;
const MIN_DISCOVERED_ITEMS: usize = 5;
const MAX_SCRAPED_ARTICLES: usize = 8;
const MIN_TITLE_LEN: usize = 10;

const GENERIC_DESCRIPTION: &str =
    "Avviso di sicurezza pubblicato dall'Agenzia per la Cybersicurezza Nazionale.";

pub async fn pipeline(fetcher: &dyn Fetch, cfg: &FeedsConfig) -> Vec<FeedItem> {
    if let Some(xml) = fetcher.fetch_text(&cfg.csirt_rss_url).await {
        let items = classify_items(rss::extract_items(&xml, &THREAT_PARAMS));
        if !items.is_empty() {
            return items;
        }
    }
    tracing::info!("primary csirt feed empty, entering discovery fallback");
    counter!("feeds_threat_discovery_total").increment(1);
    discovery_fallback(fetcher, cfg).await
}

/// Severity per advisory: keyword scan over title+description, default medium.
fn classify_items(items: Vec<FeedItem>) -> Vec<FeedItem> {
    items
        .into_iter()
        .map(|mut it| {
            let text = format!("{} {}", it.title, it.description);
            it.severity = Some(classify(&text, DEFAULT_SEVERITY));
            it
        })
        .collect()
}

/// Steps short-circuit: index fetch -> discovered feeds -> direct scrape.
/// Everything failing leaves the static dataset to the orchestrator.
async fn discovery_fallback(fetcher: &dyn Fetch, cfg: &FeedsConfig) -> Vec<FeedItem> {
    let Some(index_html) = fetcher.fetch_text(&cfg.acn_index_url).await else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for url in discover_feed_urls(&index_html, &cfg.acn_base_url)
        .into_iter()
        .take(MAX_FEED_CANDIDATES)
    {
        if let Some(xml) = fetcher.fetch_text(&url).await {
            items.extend(classify_items(rss::extract_items(&xml, &THREAT_PARAMS)));
            if items.len() >= MIN_DISCOVERED_ITEMS {
                break;
            }
        }
    }
    if !items.is_empty() {
        return items;
    }

    scrape_index_articles(&index_html, &cfg.acn_base_url)
}

/// Candidate feed URLs embedded in an HTML page: anchors whose href contains
/// `.xml`, or `rss`/`feed`, minus social/share noise. Order preserved,
/// duplicates dropped.
pub fn discover_feed_urls(page: &str, base_url: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for href in html::anchor_hrefs(page) {
        let folded = href.to_lowercase();
        let feed_like =
            folded.contains(".xml") || folded.contains("rss") || folded.contains("feed");
        if !feed_like || html::is_excluded(&folded) {
            continue;
        }
        let resolved = html::resolve_url(&href, base_url);
        if seen.insert(resolved.clone()) {
            out.push(resolved);
        }
    }
    out
}

/// Last resort: treat the index page's own `<article>` blocks as advisories.
pub fn scrape_index_articles(page: &str, base_url: &str) -> Vec<FeedItem> {
    let mut out = Vec::new();
    for block in html::article_blocks(page).into_iter().take(MAX_SCRAPED_ARTICLES) {
        let Some((raw_title, Some(href))) = html::title_and_href(&block) else {
            continue;
        };
        let title = normalize_text(&raw_title);
        if title.chars().count() < MIN_TITLE_LEN {
            continue;
        }
        let url = html::resolve_url(&href, base_url);
        if html::is_excluded(&title) || html::is_excluded(&url) {
            continue;
        }

        let date = match html::date_fragment(&block) {
            Some(fragment) => dates::display_or_unavailable(&fragment),
            None => dates::DATE_UNAVAILABLE.to_string(),
        };

        out.push(FeedItem {
            severity: Some(classify(&title, DEFAULT_SEVERITY)),
            description: GENERIC_DESCRIPTION.to_string(),
            title,
            url,
            date,
            category: Category::Threat,
            cve_identifier: None,
        });
    }
    out
}

/// Curated advisories served when every live path yields nothing.
pub fn fallback_items() -> Vec<FeedItem> {
    let item = |title: &str, description: &str, url: &str, date: &str, severity: Severity| FeedItem {
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        date: date.to_string(),
        category: Category::Threat,
        severity: Some(severity),
        cve_identifier: None,
    };
    vec![
        item(
            "Campagna ransomware in corso contro la pubblica amministrazione",
            "Rilevata una campagna ransomware mirata a enti pubblici italiani con esfiltrazione di dati prima della cifratura.",
            "https://www.csirt.gov.it/contenuti/campagna-ransomware-pa",
            "20 gennaio 2025",
            Severity::Critical,
        ),
        item(
            "Phishing a tema bancario veicolato via PEC",
            "Messaggi PEC contraffatti distribuiscono malware bancario a cittadini e imprese attraverso falsi avvisi di pagamento.",
            "https://www.csirt.gov.it/contenuti/phishing-pec-bancario",
            "17 gennaio 2025",
            Severity::High,
        ),
        item(
            "Sfruttamento attivo di vulnerabilità in dispositivi di rete perimetrali",
            "Osservati tentativi di sfruttamento contro VPN e firewall esposti; si raccomanda l'aggiornamento immediato dei firmware.",
            "https://www.csirt.gov.it/contenuti/sfruttamento-dispositivi-rete",
            "14 gennaio 2025",
            Severity::Critical,
        ),
        item(
            "Aggiornamenti di sicurezza per prodotti Microsoft",
            "Il patch Tuesday mensile corregge vulnerabilità in Windows, Office ed Exchange; alcune risultano già sfruttate.",
            "https://www.csirt.gov.it/contenuti/patch-tuesday",
            "10 gennaio 2025",
            Severity::High,
        ),
        item(
            "Misure di mitigazione per attacchi DDoS a siti istituzionali",
            "Pubblicate le linee guida per la protezione dei servizi esposti da campagne DDoS rivendicate da gruppi hacktivisti.",
            "https://www.csirt.gov.it/contenuti/mitigazione-ddos",
            "7 gennaio 2025",
            Severity::Medium,
        ),
    ]
}
