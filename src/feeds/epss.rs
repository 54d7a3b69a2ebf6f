// src/feeds/epss.rs
// Exploit-prediction pipeline: one composite pattern pulls all five fields
// out of each repeating card on the predictions page. This extractor is
// coupled to a single external page's markup, so it also owns the most
// generous static fallback.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::FeedsConfig;
use crate::feeds::types::EpssPrediction;
use crate::fetch::Fetch;
use crate::severity::Severity;

const MAX_CARDS: usize = 12;

// One match per card: vendor heading, link-wrapped CVE id, prediction
// percentage, CVSS badge, severity label. The page is segmented at each
// vendor heading first, so a card missing a field can never borrow fields
// from the card after it.
static RE_CARD_FIELDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<h5[^>]*>([^<]+)</h5>\s*<a[^>]*href\s*=\s*"[^"]*"[^>]*>\s*(CVE-\d{4}-\d+)\s*</a>.*?Prediction\s*\+?(\d+(?:\.\d+)?)\s*%.*?class\s*=\s*"[^"]*badge[^"]*"[^>]*>\s*(\d+(?:\.\d+)?)\s*</span>.*?<small[^>]*>\s*([a-z]+)\s*</small>"#,
    )
    .unwrap()
});

/// Split the page at each vendor heading; one segment spans one card.
fn card_segments(page: &str) -> Vec<&str> {
    let starts: Vec<usize> = page.match_indices("<h5").map(|(i, _)| i).collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(page.len());
            &page[start..end]
        })
        .collect()
}

pub async fn pipeline(fetcher: &dyn Fetch, cfg: &FeedsConfig) -> Vec<EpssPrediction> {
    let Some(body) = fetcher.fetch_text(&cfg.epss_page_url).await else {
        return Vec::new();
    };
    let predictions = extract_predictions(&body);
    counter!("feeds_items_total").increment(predictions.len() as u64);
    predictions
}

/// Extract prediction records from raw page HTML. A card that fails any
/// field parse is discarded whole; no partial record is ever emitted.
pub fn extract_predictions(page: &str) -> Vec<EpssPrediction> {
    let mut out = Vec::new();
    for caps in card_segments(page)
        .into_iter()
        .filter_map(|seg| RE_CARD_FIELDS.captures(seg))
        .take(MAX_CARDS)
    {
        let vendor = caps[1].trim().to_string();
        if vendor.is_empty() {
            continue;
        }
        let cve = caps[2].to_ascii_uppercase();

        let Ok(prediction_percent) = caps[3].parse::<f64>() else {
            continue;
        };
        let Ok(cvss_score) = caps[4].parse::<f64>() else {
            continue;
        };
        let Some(severity) = Severity::from_label(&caps[5]) else {
            continue;
        };
        if prediction_percent < 0.0 || !(0.0..=10.0).contains(&cvss_score) {
            continue;
        }

        out.push(EpssPrediction {
            url: vuln_url(&cve),
            cve_identifier: cve,
            vendor,
            prediction_percent,
            cvss_score,
            severity,
        });
    }
    out
}

fn vuln_url(cve: &str) -> String {
    format!("https://nvd.nist.gov/vuln/detail/{cve}")
}

/// Curated predictions served when the live page yields nothing.
pub fn fallback_predictions() -> Vec<EpssPrediction> {
    let entry = |cve: &str, vendor: &str, percent: f64, cvss: f64, severity: Severity| {
        EpssPrediction {
            cve_identifier: cve.to_string(),
            vendor: vendor.to_string(),
            prediction_percent: percent,
            cvss_score: cvss,
            severity,
            url: vuln_url(cve),
        }
    };
    vec![
        entry("CVE-2016-10033", "PHPMailer", 94.20, 9.8, Severity::Critical),
        entry("CVE-2021-44228", "Apache Log4j2", 94.42, 10.0, Severity::Critical),
        entry("CVE-2017-5638", "Apache Struts", 94.35, 10.0, Severity::Critical),
        entry("CVE-2019-0708", "Microsoft Remote Desktop", 94.47, 9.8, Severity::Critical),
        entry("CVE-2017-0144", "Microsoft SMBv1", 94.28, 8.1, Severity::High),
        entry("CVE-2018-13379", "Fortinet FortiOS", 93.95, 9.8, Severity::Critical),
    ]
}
