// src/severity.rs
// Four-level severity model plus the keyword scan used to classify scraped
// advisory text. Keywords cover both Italian and English, since the sources
// mix the two freely.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Parse a scraped severity word (any case). Accepts the Italian labels
    /// the sources occasionally use.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" | "critico" | "critica" => Some(Self::Critical),
            "high" | "alta" | "alto" => Some(Self::High),
            "medium" | "media" | "medio" => Some(Self::Medium),
            "low" | "bassa" | "basso" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

// Ordered keyword groups, strongest first. Stems ("critic", "aggiornament")
// cover the inflected Italian forms.
const CRITICAL_KEYWORDS: &[&str] = &[
    "critic",
    "zero-day",
    "0-day",
    "ransomware",
    "remote code execution",
    "sfruttamento attivo",
    "actively exploited",
    "emergenz",
];
const HIGH_KEYWORDS: &[&str] = &[
    "high",
    "alta",
    "elevat",
    "exploit",
    "vulnerabilit",
    "attacco",
    "attack",
    "malware",
    "violazione",
    "breach",
];
const MEDIUM_KEYWORDS: &[&str] = &[
    "medium",
    "media",
    "patch",
    "aggiornament",
    "update",
    "advisory",
    "avviso",
];
const LOW_KEYWORDS: &[&str] = &["low", "bassa", "informativ"];

/// First-match-wins keyword scan over case-folded text. No keyword at all
/// yields the caller's per-pipeline default.
pub fn classify(text: &str, default: Severity) -> Severity {
    let folded = text.to_lowercase();
    let groups: [(&[&str], Severity); 4] = [
        (CRITICAL_KEYWORDS, Severity::Critical),
        (HIGH_KEYWORDS, Severity::High),
        (MEDIUM_KEYWORDS, Severity::Medium),
        (LOW_KEYWORDS, Severity::Low),
    ];
    for (keywords, level) in groups {
        if keywords.iter().any(|k| folded.contains(k)) {
            return level;
        }
    }
    default
}

static RE_CVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)CVE-\d{4}-\d+").unwrap());

/// First CVE identifier in `text`, uppercased, if any.
pub fn extract_cve_id(text: &str) -> Option<String> {
    RE_CVE.find(text).map(|m| m.as_str().to_ascii_uppercase())
}

/// Serde adapter for the EPSS records, which carry severity UPPERCASE on the
/// wire while feed items stay lowercase.
pub mod upper {
    use super::Severity;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sev: &Severity, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(sev.as_upper())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Severity, D::Error> {
        let raw = String::deserialize(de)?;
        Severity::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown severity '{raw}'")))
    }
}
