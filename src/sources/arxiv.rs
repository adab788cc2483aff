//! arXiv fetch adapter, built on the Atom query API.
//!
//! One request per query, sorted by submission date descending. The API
//! over-fetches (2 × limit) because the pipeline's recency filter and
//! cross-source dedup run later and would otherwise leave short buckets.

use serde::Deserialize;
use std::error::Error;
use tracing::{info, instrument};

use crate::http;
use crate::models::RawRecord;

const API_BASE: &str = "http://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

/// Fetch records for an arXiv query, capped at `limit`.
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub async fn fetch_records(query: &str, limit: usize) -> Result<Vec<RawRecord>, Box<dyn Error>> {
    let url = format!(
        "{API_BASE}?search_query={}&sortBy=submittedDate&sortOrder=descending&max_results={}",
        urlencoding::encode(query),
        limit * 2
    );
    let (body, _) = http::get_text(&url).await?;
    let records = parse_feed(&body, limit)?;
    info!(count = records.len(), "Fetched arXiv records");
    Ok(records)
}

fn parse_feed(body: &str, limit: usize) -> Result<Vec<RawRecord>, Box<dyn Error>> {
    let feed: AtomFeed = quick_xml::de::from_str(body)?;
    let mut records = Vec::new();
    for entry in feed.entries {
        let url = pick_link(&entry);
        if url.is_empty() {
            continue;
        }
        records.push(RawRecord {
            title: entry.title.unwrap_or_default(),
            summary: entry.summary.unwrap_or_default(),
            url,
            source: "arXiv".to_string(),
            published: entry.published.or(entry.updated).unwrap_or_default(),
            media: None,
            base_tags: Vec::new(),
        });
        if records.len() >= limit {
            break;
        }
    }
    Ok(records)
}

/// Link selection policy, fixed: prefer the `text/html` landing link (it
/// carries the preview metadata the cover resolver needs), then the
/// `application/pdf` link, then the entry id.
fn pick_link(entry: &AtomEntry) -> String {
    for wanted in ["text/html", "application/pdf"] {
        let hit = entry
            .links
            .iter()
            .find(|l| l.kind.as_deref() == Some(wanted))
            .and_then(|l| l.href.clone());
        if let Some(href) = hit {
            return href;
        }
    }
    entry.id.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2508.11111v1</id>
    <title>Deep learning for
      cardiac MRI segmentation</title>
    <summary>We propose a model for cardiac MRI.</summary>
    <published>2025-08-28T17:59:00Z</published>
    <updated>2025-08-29T01:00:00Z</updated>
    <link href="http://arxiv.org/abs/2508.11111v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2508.11111v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2508.22222v1</id>
    <title>Single-cell genomics pipeline</title>
    <summary>A benchmark study.</summary>
    <updated>2025-08-27T12:00:00Z</updated>
    <link title="pdf" href="http://arxiv.org/pdf/2508.22222v1" rel="related" type="application/pdf"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let records = parse_feed(FEED, 10).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].title.contains("cardiac MRI"));
        assert_eq!(records[0].source, "arXiv");
        assert_eq!(records[0].published, "2025-08-28T17:59:00Z");
    }

    #[test]
    fn test_parse_feed_respects_limit() {
        let records = parse_feed(FEED, 1).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_link_policy_prefers_html_over_pdf() {
        let records = parse_feed(FEED, 10).unwrap();
        assert_eq!(records[0].url, "http://arxiv.org/abs/2508.11111v1");
    }

    #[test]
    fn test_link_policy_falls_back_to_pdf() {
        let records = parse_feed(FEED, 10).unwrap();
        assert_eq!(records[1].url, "http://arxiv.org/pdf/2508.22222v1");
    }

    #[test]
    fn test_updated_used_when_published_missing() {
        let records = parse_feed(FEED, 10).unwrap();
        assert_eq!(records[1].published, "2025-08-27T12:00:00Z");
    }

    #[test]
    fn test_pick_link_falls_back_to_id() {
        let entry = AtomEntry {
            id: Some("http://arxiv.org/abs/2508.33333v1".to_string()),
            title: None,
            summary: None,
            published: None,
            updated: None,
            links: vec![],
        };
        assert_eq!(pick_link(&entry), "http://arxiv.org/abs/2508.33333v1");
    }
}
