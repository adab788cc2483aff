//! Markdown digest output.
//!
//! Renders the snapshot as a single document: a dated heading with the total
//! count, then one section per topic in configured order. Topics with no
//! items get an explicit placeholder so readers can tell "nothing today"
//! from "section missing".

use std::fmt::Write;

use crate::models::Snapshot;

/// Render the full digest document.
pub fn snapshot_to_markdown(snapshot: &Snapshot) -> String {
    let mut md = String::new();
    writeln!(md, "# Daily Biomedical Digest · {}\n", snapshot.date).unwrap();
    let total = snapshot.total_items();
    let noun = if total == 1 { "item" } else { "items" };
    writeln!(md, "{total} {noun}\n").unwrap();

    for bucket in &snapshot.buckets {
        writeln!(md, "### {}\n", bucket.title).unwrap();
        if bucket.items.is_empty() {
            writeln!(md, "_No items today._\n").unwrap();
            continue;
        }
        for item in &bucket.items {
            let tags = item.tags.join(", ");
            writeln!(md, "- **[{}]({})**  ", item.title, item.url).unwrap();
            writeln!(md, "  {} · {}  ", item.source, item.time).unwrap();
            writeln!(md, "  Tags: {}\n", tags).unwrap();
            if !item.summary.is_empty() {
                writeln!(md, "  {}\n", item.summary).unwrap();
            }
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Item};

    fn item(title: &str) -> Item {
        Item {
            id: "0011223344556677".to_string(),
            title: title.to_string(),
            summary: "A short summary.".to_string(),
            url: "https://example.com/a".to_string(),
            cover: String::new(),
            source: "Nature Methods".to_string(),
            time: "2025-08-30".to_string(),
            tags: vec!["Journal".to_string(), "Single-cell".to_string()],
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            date: "2025-08-30".to_string(),
            buckets: vec![
                Bucket {
                    key: "ai_biomed".to_string(),
                    title: "AI in Biomedicine".to_string(),
                    items: vec![item("Deep learning for cardiac MRI")],
                },
                Bucket {
                    key: "microfluidics".to_string(),
                    title: "Microfluidics".to_string(),
                    items: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_markdown_heading_and_count() {
        let md = snapshot_to_markdown(&snapshot());
        assert!(md.starts_with("# Daily Biomedical Digest · 2025-08-30"));
        assert!(md.contains("1 item\n"));
        assert!(!md.contains("1 items"));
    }

    #[test]
    fn test_markdown_count_pluralizes() {
        let mut snap = snapshot();
        snap.buckets[1].items = vec![item("A droplet assay"), item("Another assay")];
        let md = snapshot_to_markdown(&snap);
        assert!(md.contains("3 items\n"));
    }

    #[test]
    fn test_markdown_renders_item_fields() {
        let md = snapshot_to_markdown(&snapshot());
        assert!(md.contains("- **[Deep learning for cardiac MRI](https://example.com/a)**"));
        assert!(md.contains("Nature Methods · 2025-08-30"));
        assert!(md.contains("Tags: Journal, Single-cell"));
        assert!(md.contains("A short summary."));
    }

    #[test]
    fn test_markdown_empty_topic_placeholder() {
        let md = snapshot_to_markdown(&snapshot());
        let micro_section = md.split("### Microfluidics").nth(1).unwrap();
        assert!(micro_section.contains("_No items today._"));
    }

    #[test]
    fn test_markdown_sections_in_bucket_order() {
        let md = snapshot_to_markdown(&snapshot());
        let ai = md.find("### AI in Biomedicine").unwrap();
        let micro = md.find("### Microfluidics").unwrap();
        assert!(ai < micro);
    }
}
