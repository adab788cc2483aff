//! Data models for the aggregation pipeline.
//!
//! - [`RawRecord`]: the canonical per-source record shape every fetch adapter
//!   produces, before normalization
//! - [`Item`]: the normalized, tagged unit record
//! - [`Bucket`]: one topic's capped, deduplicated item list
//! - [`Snapshot`]: the complete dated output of one run
//!
//! [`Item`] is the only type that crosses the serialization boundary; its
//! field order is the field order of the JSON output.

use serde::{Deserialize, Serialize};

/// A raw record as returned by a fetch adapter.
///
/// Adapters for PubMed, arXiv, and syndicated feeds all reduce their
/// source-specific payloads to this shape so nothing downstream branches on
/// source type.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// Item title, possibly with stray whitespace.
    pub title: String,
    /// Abstract or description; may contain HTML when adapters do not strip it.
    pub summary: String,
    /// Landing-page URL.
    pub url: String,
    /// Human-readable publisher, journal, or feed name.
    pub source: String,
    /// Publication timestamp exactly as the source reported it.
    pub published: String,
    /// Feed-embedded media URL, when the source carries one.
    pub media: Option<String>,
    /// Tags the adapter already knows apply (e.g. "Peer-reviewed").
    pub base_tags: Vec<String>,
}

/// A normalized item ready for tagging, filtering, and output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable short identity derived from the canonical URL (or title).
    pub id: String,
    /// Whitespace-collapsed title.
    pub title: String,
    /// Whitespace-collapsed, length-capped excerpt.
    pub summary: String,
    /// Canonical landing-page URL.
    pub url: String,
    /// Representative image URL; empty when none could be resolved.
    pub cover: String,
    /// Publisher, journal, or host name.
    pub source: String,
    /// Calendar date in `YYYY-MM-DD`, interpreted in the reference timezone.
    pub time: String,
    /// Sorted topical labels, no duplicates.
    pub tags: Vec<String>,
}

/// One topic's assembled output for a single run.
#[derive(Debug)]
pub struct Bucket {
    /// Stable topic key used in the JSON output (e.g. `ai_biomed`).
    pub key: String,
    /// Display title for the Markdown digest.
    pub title: String,
    /// Deduplicated items, sorted by date descending, capped.
    pub items: Vec<Item>,
}

/// The day's complete output: a date plus every topic bucket.
///
/// Built once per run and never mutated after assembly; both output artifacts
/// are rendered from the same instance.
#[derive(Debug)]
pub struct Snapshot {
    /// Run date in `YYYY-MM-DD` (reference timezone).
    pub date: String,
    /// Buckets in configured topic order.
    pub buckets: Vec<Bucket>,
}

impl Snapshot {
    /// Total item count across all buckets.
    pub fn total_items(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        Item {
            id: "00112233aabbccdd".to_string(),
            title: "Deep learning for cardiac MRI".to_string(),
            summary: "A study.".to_string(),
            url: "https://pubmed.ncbi.nlm.nih.gov/12345/".to_string(),
            cover: String::new(),
            source: "Nature Medicine".to_string(),
            time: "2025-08-29".to_string(),
            tags: vec!["Journal".to_string(), "Peer-reviewed".to_string()],
        }
    }

    #[test]
    fn test_item_serializes_with_stable_field_order() {
        let json = serde_json::to_string(&sample_item()).unwrap();
        let id_pos = json.find("\"id\"").unwrap();
        let title_pos = json.find("\"title\"").unwrap();
        let time_pos = json.find("\"time\"").unwrap();
        let tags_pos = json.find("\"tags\"").unwrap();
        assert!(id_pos < title_pos);
        assert!(title_pos < time_pos);
        assert!(time_pos < tags_pos);
    }

    #[test]
    fn test_item_round_trips_non_ascii_unescaped() {
        let mut item = sample_item();
        item.summary = "микрофлюидика 研究…".to_string();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("микрофлюидика 研究…"));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary, item.summary);
    }

    #[test]
    fn test_snapshot_total_items() {
        let snapshot = Snapshot {
            date: "2025-08-30".to_string(),
            buckets: vec![
                Bucket {
                    key: "ai_biomed".to_string(),
                    title: "AI in Biomedicine".to_string(),
                    items: vec![sample_item(), sample_item()],
                },
                Bucket {
                    key: "microfluidics".to_string(),
                    title: "Microfluidics".to_string(),
                    items: vec![],
                },
            ],
        };
        assert_eq!(snapshot.total_items(), 2);
    }
}
