//! Utility functions for text cleanup, identity hashing, URL handling, and
//! file system checks.
//!
//! Everything here is small and pure except [`ensure_writable_dir`], which
//! probes the output directory before the pipeline spends any network time.

use chrono::{FixedOffset, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Maximum summary length in characters before truncation.
pub const SUMMARY_CAP: usize = 800;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The fixed reference timezone for all calendar math (JST, UTC+9).
///
/// Item dates, the recency window, and the snapshot date are all evaluated
/// against "today" in this timezone regardless of where the process runs.
pub fn reference_tz() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// Today's calendar date in the reference timezone.
pub fn today_reference() -> NaiveDate {
    Utc::now().with_timezone(&reference_tz()).date_naive()
}

/// Collapse all runs of whitespace (including newlines) to single spaces
/// and trim the ends.
pub fn collapse_ws(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").into_owned()
}

/// Truncate a summary to `cap` characters, appending an ellipsis marker
/// when anything was cut.
pub fn truncate_summary(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let cut: String = s.chars().take(cap).collect();
    format!("{}…", cut.trim_end())
}

/// Stable short identity for an item: the first 16 hex characters of the
/// SHA-256 of the input.
///
/// Fed the canonical URL (or the title when no URL exists), this makes item
/// ids deterministic across runs, which keeps deduplication stable.
pub fn short_hash(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

/// Strip the query string and fragment from a URL, yielding the canonical
/// form used as a deduplication key. Unparseable input is returned unchanged.
pub fn strip_query(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Lowercased host of a URL, if it has one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(|h| h.to_lowercase())
}

/// Reduce an HTML fragment (feed descriptions are often marked up) to its
/// plain text content with entities decoded.
pub fn strip_html(s: &str) -> String {
    if !s.contains('<') && !s.contains('&') {
        return s.to_string();
    }
    let fragment = Html::parse_fragment(s);
    let text: Vec<&str> = fragment.root_element().text().collect();
    collapse_ws(&text.join(" "))
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then performs a write test by creating
/// and immediately deleting a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
