// src/feeds/types.rs
use serde::{Deserialize, Serialize};

use crate::severity::{self, Severity};

/// Provenance tag, assigned once by the owning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nis2,
    Threat,
    Cve,
}

/// Unified article/alert representation shared by the three feed pipelines.
/// An item only exists with a non-empty title and url; extractors drop
/// anything else instead of emitting placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Display string: "15 gennaio 2025", or one of the date sentinels.
    pub date: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_identifier: Option<String>,
}

/// One exploit-prediction card. Constructed only when all five captured
/// fields parsed; partial matches are discarded upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpssPrediction {
    pub cve_identifier: String,
    pub vendor: String,
    pub prediction_percent: f64,
    pub cvss_score: f64,
    #[serde(with = "severity::upper")]
    pub severity: Severity,
    pub url: String,
}

/// The four collections the aggregator hands to the response boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    pub nis2: Vec<FeedItem>,
    pub threat: Vec<FeedItem>,
    pub cve: Vec<FeedItem>,
    pub epss: Vec<EpssPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_item_serializes_camel_case_and_skips_absent_options() {
        let item = FeedItem {
            title: "Avviso".into(),
            description: "desc".into(),
            url: "https://example.test/a".into(),
            date: "1 marzo 2025".into(),
            category: Category::Nis2,
            severity: None,
            cve_identifier: None,
        };
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["category"], "nis2");
        assert!(v.get("severity").is_none());
        assert!(v.get("cveIdentifier").is_none());
    }

    #[test]
    fn epss_severity_is_uppercase_on_the_wire() {
        let p = EpssPrediction {
            cve_identifier: "CVE-2016-10033".into(),
            vendor: "PHPMailer".into(),
            prediction_percent: 94.2,
            cvss_score: 9.8,
            severity: Severity::Critical,
            url: "https://nvd.nist.gov/vuln/detail/CVE-2016-10033".into(),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["severity"], "CRITICAL");
        assert_eq!(v["cveIdentifier"], "CVE-2016-10033");
        assert_eq!(v["predictionPercent"], 94.2);
        assert_eq!(v["cvssScore"], 9.8);
    }
}
