//! Normalization of raw source records into [`Item`]s.
//!
//! The sources disagree on almost everything: PubMed reports partial Medline
//! dates (`2025 Aug`), feeds use RFC 822 timestamps, arXiv uses RFC 3339, and
//! summaries arrive with arbitrary whitespace. Everything funnels through
//! [`to_item`] so downstream stages see one shape with one date format.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Item, RawRecord};
use crate::utils::{collapse_ws, reference_tz, short_hash, truncate_summary, SUMMARY_CAP};

static YMD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[-/\.](\d{1,2})[-/\.](\d{1,2})").unwrap());

// Medline pubdate: year, optional month name, optional day ("2025 Aug 12",
// "2025 Aug-Sep", "2025").
static MEDLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})\b(?:\s+([A-Za-z]{3,}))?(?:\s+(\d{1,2}))?").unwrap());

/// Convert a raw record into a normalized item.
///
/// Returns `None` for records lacking both a URL and a title, since such a
/// record has no usable identity. Every other defect is repaired with a
/// default: unparseable dates become today (reference timezone), missing
/// fields become empty strings.
pub fn to_item(raw: RawRecord, today: NaiveDate) -> Option<Item> {
    let title = collapse_ws(&raw.title);
    let url = raw.url.trim().to_string();
    if url.is_empty() && title.is_empty() {
        return None;
    }

    let id = if url.is_empty() {
        short_hash(&title)
    } else {
        short_hash(&url)
    };

    Some(Item {
        id,
        title,
        summary: truncate_summary(&collapse_ws(&raw.summary), SUMMARY_CAP),
        url,
        cover: raw.media.map(|m| m.trim().to_string()).unwrap_or_default(),
        source: collapse_ws(&raw.source),
        time: normalize_date(&raw.published, today).to_string(),
        tags: raw.base_tags,
    })
}

/// Normalize any date representation the sources emit to a calendar date.
///
/// Accepted, in order: a `YYYY-MM-DD` prefix (covers ISO and RFC 3339
/// strings), full RFC 2822 and RFC 3339 timestamps (converted to the
/// reference timezone before taking the date), `Y-M-D` with `/` or `.`
/// separators, and Medline partial dates with missing month/day defaulting
/// to 1. Anything else yields `today`.
pub fn normalize_date(raw: &str, today: NaiveDate) -> NaiveDate {
    let s = raw.trim();
    if s.is_empty() {
        return today;
    }

    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return d;
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return dt.with_timezone(&reference_tz()).date_naive();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&reference_tz()).date_naive();
    }

    if let Some(caps) = YMD_RE.captures(s) {
        let y: i32 = caps[1].parse().unwrap_or(0);
        let m: u32 = caps[2].parse().unwrap_or(0);
        let d: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return date;
        }
    }

    if let Some(caps) = MEDLINE_RE.captures(s) {
        let y: i32 = caps[1].parse().unwrap_or(0);
        let m = caps
            .get(2)
            .and_then(|m| month_number(m.as_str()))
            .unwrap_or(1);
        let d: u32 = caps
            .get(3)
            .and_then(|d| d.as_str().parse().ok())
            .unwrap_or(1);
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return date;
        }
    }

    today
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let key = lower.get(..3)?;
    match key {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
