//! Syndicated-feed fetch adapter.
//!
//! Parses a feed URL as RSS 2.0 first and falls back to Atom. Summaries
//! arrive as HTML more often than not and are stripped to plain text here.
//! Embedded media (`media:thumbnail`, `media:content`, image enclosures)
//! pre-seeds the item's cover so the resolver can skip those pages entirely.

use serde::Deserialize;
use std::error::Error;
use tracing::{info, instrument};

use crate::http;
use crate::models::RawRecord;
use crate::utils::strip_html;

#[derive(Debug, Deserialize)]
struct RssDoc {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    enclosure: Option<MediaRef>,
    // quick-xml strips namespace prefixes, so `media:content` and
    // `media:thumbnail` deserialize under their local names.
    #[serde(rename = "content")]
    media_content: Option<MediaRef>,
    #[serde(rename = "thumbnail")]
    media_thumbnail: Option<MediaRef>,
}

#[derive(Debug, Deserialize)]
struct MediaRef {
    #[serde(rename = "@url")]
    url: Option<String>,
    #[serde(rename = "@type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomDoc {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
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
}

/// Fetch and parse one feed into raw records.
#[instrument(level = "info", skip_all, fields(source = %name))]
pub async fn fetch_records(name: &str, feed_url: &str) -> Result<Vec<RawRecord>, Box<dyn Error>> {
    let (body, _) = http::get_text(feed_url).await?;
    let records = parse_feed(name, &body)?;
    info!(count = records.len(), "Fetched feed entries");
    Ok(records)
}

/// Parse a feed body, RSS 2.0 first, Atom as fallback.
fn parse_feed(name: &str, body: &str) -> Result<Vec<RawRecord>, Box<dyn Error>> {
    if let Ok(rss) = quick_xml::de::from_str::<RssDoc>(body) {
        return Ok(rss
            .channel
            .items
            .into_iter()
            .map(|item| rss_item_to_record(name, item))
            .collect());
    }
    let atom: AtomDoc = quick_xml::de::from_str(body)?;
    Ok(atom
        .entries
        .into_iter()
        .map(|entry| atom_entry_to_record(name, entry))
        .collect())
}

fn rss_item_to_record(name: &str, item: RssItem) -> RawRecord {
    let media = pick_media(&item);
    RawRecord {
        title: strip_html(&item.title.unwrap_or_default()),
        summary: strip_html(&item.description.unwrap_or_default()),
        url: item.link.unwrap_or_default().trim().to_string(),
        source: name.to_string(),
        published: item.pub_date.unwrap_or_default(),
        media,
        base_tags: Vec::new(),
    }
}

fn atom_entry_to_record(name: &str, entry: AtomEntry) -> RawRecord {
    let url = entry
        .links
        .iter()
        .find_map(|l| l.href.clone())
        .unwrap_or_default();
    RawRecord {
        title: strip_html(&entry.title.unwrap_or_default()),
        summary: strip_html(&entry.summary.unwrap_or_default()),
        url,
        source: name.to_string(),
        published: entry.published.or(entry.updated).unwrap_or_default(),
        media: None,
        base_tags: Vec::new(),
    }
}

/// Embedded media preference: thumbnail, then media:content, then an
/// enclosure that declares an image type.
fn pick_media(item: &RssItem) -> Option<String> {
    if let Some(url) = item.media_thumbnail.as_ref().and_then(|m| m.url.clone()) {
        return Some(url);
    }
    if let Some(url) = item.media_content.as_ref().and_then(|m| m.url.clone()) {
        return Some(url);
    }
    item.enclosure
        .as_ref()
        .filter(|e| {
            e.kind
                .as_deref()
                .map(|k| k.starts_with("image/"))
                .unwrap_or(false)
        })
        .and_then(|e| e.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Lab on a Chip</title>
    <item>
      <title>A droplet microfluidic assay</title>
      <link>https://pubs.rsc.org/en/content/articlelanding/2025/lc/d5lc00001a?src=rss</link>
      <description>&lt;p&gt;A &lt;b&gt;droplet&lt;/b&gt; platform for diagnostics.&lt;/p&gt;</description>
      <pubDate>Thu, 28 Aug 2025 08:00:00 GMT</pubDate>
      <media:thumbnail url="https://pubs.rsc.org/image/d5lc00001a.gif"/>
    </item>
    <item>
      <title>No date entry</title>
      <link>https://pubs.rsc.org/en/content/articlelanding/2025/lc/d5lc00002b</link>
      <description>Plain description.</description>
      <enclosure url="https://pubs.rsc.org/audio/ep.mp3" type="audio/mpeg"/>
    </item>
  </channel>
</rss>"#;

    const ATOM_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>bioRxiv Bioinformatics</title>
  <entry>
    <title>A single-cell workflow</title>
    <summary>Preprint summary.</summary>
    <updated>2025-08-29T00:00:00Z</updated>
    <link href="https://www.biorxiv.org/content/10.1101/2025.08.29.999999v1"/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss_items() {
        let records = parse_feed("Lab on a Chip", RSS_BODY).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A droplet microfluidic assay");
        assert_eq!(records[0].source, "Lab on a Chip");
        assert_eq!(records[0].published, "Thu, 28 Aug 2025 08:00:00 GMT");
    }

    #[test]
    fn test_rss_description_html_is_stripped() {
        let records = parse_feed("Lab on a Chip", RSS_BODY).unwrap();
        assert!(!records[0].summary.contains('<'));
        assert!(records[0].summary.contains("droplet"));
    }

    #[test]
    fn test_rss_media_thumbnail_becomes_cover_seed() {
        let records = parse_feed("Lab on a Chip", RSS_BODY).unwrap();
        assert_eq!(
            records[0].media.as_deref(),
            Some("https://pubs.rsc.org/image/d5lc00001a.gif")
        );
    }

    #[test]
    fn test_rss_non_image_enclosure_ignored() {
        let records = parse_feed("Lab on a Chip", RSS_BODY).unwrap();
        assert_eq!(records[1].media, None);
    }

    #[test]
    fn test_rss_missing_date_left_for_normalizer() {
        let records = parse_feed("Lab on a Chip", RSS_BODY).unwrap();
        assert_eq!(records[1].published, "");
    }

    #[test]
    fn test_parse_atom_fallback() {
        let records = parse_feed("bioRxiv Bioinformatics", ATOM_BODY).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A single-cell workflow");
        assert_eq!(records[0].published, "2025-08-29T00:00:00Z");
        assert!(records[0].url.contains("biorxiv.org"));
    }

    #[test]
    fn test_rss_media_content_used_when_no_thumbnail() {
        // The prefixed element must deserialize under its local name.
        let body = r#"<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <title>T</title>
            <link>https://example.com/a</link>
            <media:content url="https://example.com/figure.png" type="image/png"/>
        </item></channel></rss>"#;
        let records = parse_feed("X", body).unwrap();
        assert_eq!(
            records[0].media.as_deref(),
            Some("https://example.com/figure.png")
        );
    }

    #[test]
    fn test_image_enclosure_used_when_no_media_tags() {
        let body = r#"<rss version="2.0"><channel><item>
            <title>T</title>
            <link>https://example.com/a</link>
            <enclosure url="https://example.com/cover.jpg" type="image/jpeg"/>
        </item></channel></rss>"#;
        let records = parse_feed("X", body).unwrap();
        assert_eq!(records[0].media.as_deref(), Some("https://example.com/cover.jpg"));
    }
}
