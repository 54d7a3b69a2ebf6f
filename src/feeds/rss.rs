// src/feeds/rss.rs
// Generic `<channel><item>` extractor shared by the Threat and CVE pipelines.
// Sources differ only in cap, description bound and post-classification, so
// those arrive as parameters.

use anyhow::{Context, Result};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::dates;
use crate::feeds::types::{Category, FeedItem};
use crate::text::{normalize_text, truncate_chars};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct RssParams {
    pub category: Category,
    /// Items processed per source; bounds work and response size.
    pub max_items: usize,
    /// Description cap in chars before the ellipsis marker.
    pub description_limit: usize,
}

pub const THREAT_PARAMS: RssParams = RssParams {
    category: Category::Threat,
    max_items: 8,
    description_limit: 150,
};

pub const CVE_PARAMS: RssParams = RssParams {
    category: Category::Cve,
    max_items: 12,
    description_limit: 200,
};

/// Extract feed items from raw XML. Shape failures yield an empty list, never
/// an error past this boundary.
pub fn extract_items(xml: &str, params: &RssParams) -> Vec<FeedItem> {
    match parse_items(xml, params) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = ?e, category = ?params.category, "rss parse failed");
            Vec::new()
        }
    }
}

fn parse_items(xml: &str, params: &RssParams) -> Result<Vec<FeedItem>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing feed xml")?;

    let mut out = Vec::with_capacity(params.max_items);
    for it in rss.channel.item.into_iter().take(params.max_items) {
        // Title is mandatory; so is a link (items must carry a usable url).
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }
        let url = it.link.as_deref().unwrap_or_default().trim().to_string();
        if url.is_empty() {
            continue;
        }

        let description = truncate_chars(
            &normalize_text(it.description.as_deref().unwrap_or_default()),
            params.description_limit,
        );

        // RSS items always carry a date field; an unparseable one still means
        // "recently published", not "unavailable".
        let date = dates::display_or_recent(it.pub_date.as_deref().unwrap_or_default());

        out.push(FeedItem {
            title,
            description,
            url,
            date,
            category: params.category,
            severity: None,
            cve_identifier: None,
        });
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feeds_parse_ms").record(ms);
    counter!("feeds_items_total").increment(out.len() as u64);
    Ok(out)
}

fn scrub_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
