// src/feeds/html.rs
// Regex-level HTML fragment helpers shared by the scraping pipelines. The
// sources are externally owned and change shape without notice, so every
// helper degrades to "no match" instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<article[^>]*>(.*?)</article>").unwrap());
static RE_NEWS_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<div[^>]*class\s*=\s*"[^"]*(?:news|notizi|card|article|post)[^"]*"[^>]*>(.*?)</div>"#)
        .unwrap()
});

// Anchor and heading are matched separately and nested in code (the regex
// crate has no lookaround, so "a wraps h" / "h wraps a" can't be one pattern
// without bleeding across elements).
static RE_ANCHOR_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a[^>]*href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#).unwrap());
static RE_BARE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[1-5][^>]*>(.*?)</h[1-5]>").unwrap());

static RE_PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());
static RE_ANCHOR_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a[^>]*href\s*=\s*"([^"]*)""#).unwrap());
static RE_DATE_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}\s+[a-zà-ù]+\s+\d{4}\b|\b\d{1,2}[/-]\d{1,2}[/-]\d{4}\b").unwrap()
});

// Social/share chrome that must never surface as an article or a feed URL.
const EXCLUDED_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "t.me",
    "telegram.me",
    "whatsapp.com",
    "wa.me",
];
const EXCLUDED_KEYWORDS: &[&str] = &[
    "share",
    "condividi",
    "cookie",
    "login",
    "accedi",
    "newsletter",
    "torna su",
    "vai al contenuto",
    "menu",
];

/// True when a title or URL smells like navigation/social chrome.
pub fn is_excluded(s: &str) -> bool {
    let folded = s.to_lowercase();
    EXCLUDED_DOMAINS.iter().any(|d| folded.contains(d))
        || EXCLUDED_KEYWORDS.iter().any(|k| folded.contains(k))
}

/// `<article>` blocks, document order.
pub fn article_blocks(html: &str) -> Vec<String> {
    RE_ARTICLE
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// `<article>` blocks plus news/card-class `<div>` blocks, merged in
/// document-ish order (articles first), capped by the caller.
pub fn candidate_blocks(html: &str) -> Vec<String> {
    let mut blocks = article_blocks(html);
    blocks.extend(RE_NEWS_DIV.captures_iter(html).map(|c| c[1].to_string()));
    blocks
}

/// Title and optional href from a block. Variants tried in order:
/// link-wraps-heading, heading-wraps-link, bare heading.
pub fn title_and_href(block: &str) -> Option<(String, Option<String>)> {
    for c in RE_ANCHOR_BLOCK.captures_iter(block) {
        if let Some(h) = RE_BARE_HEADING.captures(&c[2]) {
            return Some((h[1].to_string(), Some(c[1].to_string())));
        }
    }
    let h = RE_BARE_HEADING.captures(block)?;
    let inner = h[1].to_string();
    if let Some(c) = RE_ANCHOR_BLOCK.captures(&inner) {
        return Some((c[2].to_string(), Some(c[1].to_string())));
    }
    Some((inner, None))
}

/// First paragraph body, raw (caller normalizes/truncates).
pub fn first_paragraph(block: &str) -> Option<String> {
    RE_PARAGRAPH.captures(block).map(|c| c[1].to_string())
}

/// All anchor hrefs in a fragment, document order.
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    RE_ANCHOR_HREF
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// First textual or numeric date fragment in a block.
pub fn date_fragment(block: &str) -> Option<String> {
    RE_DATE_FRAGMENT.find(block).map(|m| m.as_str().to_string())
}

/// Resolve a scraped href against the source origin.
pub fn resolve_url(href: &str, base: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        return format!("{base}{href}");
    }
    format!("{base}/{href}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_and_protocol_relative_urls() {
        let base = "https://www.acn.gov.it";
        assert_eq!(
            resolve_url("/portale/avviso-1", base),
            "https://www.acn.gov.it/portale/avviso-1"
        );
        assert_eq!(
            resolve_url("//cdn.acn.gov.it/x", base),
            "https://cdn.acn.gov.it/x"
        );
        assert_eq!(resolve_url("https://other.test/y", base), "https://other.test/y");
        assert_eq!(resolve_url("avvisi/2", base), "https://www.acn.gov.it/avvisi/2");
    }

    #[test]
    fn title_patterns_tried_in_order() {
        let link_wraps = r#"<a href="/a"><h3>Titolo uno</h3></a>"#;
        assert_eq!(
            title_and_href(link_wraps),
            Some(("Titolo uno".into(), Some("/a".into())))
        );

        let heading_wraps = r#"<h2><a href="/b">Titolo due</a></h2>"#;
        assert_eq!(
            title_and_href(heading_wraps),
            Some(("Titolo due".into(), Some("/b".into())))
        );

        let bare = "<h4>Titolo tre</h4>";
        assert_eq!(title_and_href(bare), Some(("Titolo tre".into(), None)));

        assert_eq!(title_and_href("<p>niente</p>"), None);
    }

    #[test]
    fn exclusion_catches_social_and_chrome() {
        assert!(is_excluded("https://facebook.com/sharer?u=x"));
        assert!(is_excluded("Condividi su Telegram: t.me/acn"));
        assert!(is_excluded("Cookie policy"));
        assert!(!is_excluded("https://www.acn.gov.it/avvisi/1"));
    }

    #[test]
    fn blocks_merge_articles_and_news_divs() {
        let html = r#"
            <article><h3>Uno</h3></article>
            <div class="news-item"><h3>Due</h3></div>
            <div class="footer">chrome</div>
        "#;
        let blocks = candidate_blocks(html);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("Uno"));
        assert!(blocks[1].contains("Due"));
    }
}
