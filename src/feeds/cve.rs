// src/feeds/cve.rs
// CVE-severity feed pipeline. The upstream feed is already filtered to
// high-impact entries, so the severity floor here is High, not Medium.

use crate::config::FeedsConfig;
use crate::feeds::rss::{self, CVE_PARAMS};
use crate::feeds::types::{Category, FeedItem};
use crate::fetch::Fetch;
use crate::severity::{extract_cve_id, Severity};

pub async fn pipeline(fetcher: &dyn Fetch, cfg: &FeedsConfig) -> Vec<FeedItem> {
    let Some(xml) = fetcher.fetch_text(&cfg.cve_rss_url).await else {
        return Vec::new();
    };
    rss::extract_items(&xml, &CVE_PARAMS)
        .into_iter()
        .map(annotate)
        .collect()
}

/// Attach the CVE identifier (from the title) and the feed-specific severity
/// heuristic to an extracted item.
fn annotate(mut item: FeedItem) -> FeedItem {
    item.cve_identifier = extract_cve_id(&item.title);
    let text = format!("{} {}", item.title, item.description).to_lowercase();
    item.severity = Some(cve_severity(&text));
    item
}

fn cve_severity(folded: &str) -> Severity {
    if folded.contains("critical") || folded.contains("remote code execution") {
        Severity::Critical
    } else {
        // the feed is severity-filtered upstream; High is the floor
        Severity::High
    }
}

/// Curated entries served when the live feed yields nothing.
pub fn fallback_items() -> Vec<FeedItem> {
    let item = |title: &str, description: &str, cve: &str, date: &str, severity: Severity| FeedItem {
        title: title.to_string(),
        description: description.to_string(),
        url: format!("https://nvd.nist.gov/vuln/detail/{cve}"),
        date: date.to_string(),
        category: Category::Cve,
        severity: Some(severity),
        cve_identifier: Some(cve.to_string()),
    };
    vec![
        item(
            "CVE-2025-0282: stack overflow in Ivanti Connect Secure",
            "Un overflow nello stack consente esecuzione di codice remoto non autenticata sui gateway VPN Ivanti esposti.",
            "CVE-2025-0282",
            "9 gennaio 2025",
            Severity::Critical,
        ),
        item(
            "CVE-2024-49138: privilege escalation nel driver CLFS di Windows",
            "Vulnerabilità sfruttata in attacchi reali che consente l'elevazione a SYSTEM tramite il driver Common Log File System.",
            "CVE-2024-49138",
            "12 dicembre 2024",
            Severity::High,
        ),
        item(
            "CVE-2024-55591: authentication bypass in Fortinet FortiOS",
            "Un bypass dell'autenticazione sull'interfaccia di gestione permette a un attaccante remoto di ottenere privilegi super-admin.",
            "CVE-2024-55591",
            "14 gennaio 2025",
            Severity::Critical,
        ),
        item(
            "CVE-2024-50623: remote code execution in Cleo file transfer",
            "Le piattaforme di file transfer Cleo Harmony e VLTrader risultano sfruttate per il rilascio di backdoor Java.",
            "CVE-2024-50623",
            "10 dicembre 2024",
            Severity::Critical,
        ),
        item(
            "CVE-2024-53677: remote code execution in Apache Struts",
            "Una falla nel meccanismo di upload dei file consente il caricamento di webshell su applicazioni Struts non aggiornate.",
            "CVE-2024-53677",
            "17 dicembre 2024",
            Severity::Critical,
        ),
    ]
}
