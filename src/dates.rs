// src/dates.rs
// Normalizes the date fragments the sources actually emit: Italian textual
// dates on the ACN pages, dd/mm/yyyy variants, and RFC-2822 feed timestamps.
// Everything renders to the dashboard's Italian display form.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

/// Shown when a date fragment could not be parsed at all.
pub const DATE_UNAVAILABLE: &str = "Data non disponibile";
/// Shown for feed items whose pubDate exists but does not parse.
pub const DATE_RECENT: &str = "Data recente";

const MONTHS_IT: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

static RE_TEXTUAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s+([a-zà-ù]+)\s+(\d{4})\b").unwrap());
static RE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap());

fn month_from_name(name: &str) -> Option<u8> {
    let folded = name.to_lowercase();
    MONTHS_IT
        .iter()
        .position(|m| *m == folded)
        .map(|i| (i + 1) as u8)
}

fn format_display(day: u8, month: u8, year: i32) -> Option<String> {
    if day == 0 || day > 31 || month == 0 || month > 12 {
        return None;
    }
    Some(format!("{} {} {}", day, MONTHS_IT[(month - 1) as usize], year))
}

/// Parse a free-text date fragment into the display form, or `None`.
/// Forms tried in order: `<day> <italian-month> <year>`, `dd/mm/yyyy` (or
/// dashes), RFC-2822.
pub fn normalize_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = RE_TEXTUAL.captures(s) {
        let day: u8 = c[1].parse().ok()?;
        if let Some(month) = month_from_name(&c[2]) {
            let year: i32 = c[3].parse().ok()?;
            return format_display(day, month, year);
        }
    }

    if let Some(c) = RE_NUMERIC.captures(s) {
        let day: u8 = c[1].parse().ok()?;
        let month: u8 = c[2].parse().ok()?;
        let year: i32 = c[3].parse().ok()?;
        return format_display(day, month, year);
    }

    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return format_display(dt.day(), dt.month() as u8, dt.year());
    }

    // chrono accepts the obsolete named zones ("GMT", "UT") some feeds emit
    chrono::DateTime::parse_from_rfc2822(s)
        .ok()
        .and_then(|dt| format_display(dt.day() as u8, dt.month() as u8, dt.year()))
}

/// Display form, or the "unavailable" sentinel. Used by the HTML extractors,
/// where a date may simply not exist on the page.
pub fn display_or_unavailable(raw: &str) -> String {
    normalize_date(raw).unwrap_or_else(|| DATE_UNAVAILABLE.to_string())
}

/// Display form, or the "recent" sentinel. Used for feed items: RSS always
/// carries a pubDate, so an unparseable one still means "recently published".
pub fn display_or_recent(raw: &str) -> String {
    normalize_date(raw).unwrap_or_else(|| DATE_RECENT.to_string())
}
