//! The per-topic assembly pipeline: recency filtering, deduplication, and
//! bucket construction.
//!
//! Sources are fetched strictly in configured order and the dedup identity
//! set is accumulated in that order, so the earlier source wins any collision
//! and the overall output is deterministic given deterministic responses.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use crate::config::{TaggerConfig, TopicConfig};
use crate::models::{Bucket, Item};
use crate::utils::strip_query;
use crate::{cover, normalize, sources, tagger};

/// Whether a normalized date string falls inside the lookback window,
/// inclusive: an item dated exactly `lookback_days` ago passes.
///
/// Unparseable dates pass rather than silently dropping an ambiguous item,
/// and future-dated items always pass.
pub fn is_recent(date_str: &str, today: NaiveDate, lookback_days: i64) -> bool {
    match NaiveDate::parse_from_str(date_str.get(..10).unwrap_or(""), "%Y-%m-%d") {
        Ok(d) => (today - d).num_days() <= lookback_days.max(0),
        Err(_) => true,
    }
}

/// Collapse items that resolve to the same logical identity, keeping the
/// first occurrence in input order.
///
/// Identity is the canonical URL (query and fragment stripped) when the item
/// has one, otherwise the lowercased (title, source) pair. The two key
/// families are namespaced so they can never collide with each other.
pub fn dedupe(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(identity_key(&item)) {
            out.push(item);
        }
    }
    out
}

fn identity_key(item: &Item) -> String {
    if !item.url.is_empty() {
        format!("url:{}", strip_query(&item.url))
    } else {
        format!(
            "ts:{}|{}",
            item.title.to_lowercase(),
            item.source.to_lowercase()
        )
    }
}

/// Sort newest-first and cap the list.
///
/// The sort is stable, so items sharing a date keep their source-priority
/// order from deduplication.
pub fn finalize(mut items: Vec<Item>, max_items: usize) -> Vec<Item> {
    items.sort_by(|a, b| b.time.cmp(&a.time));
    items.truncate(max_items);
    items
}

/// Assemble one topic bucket: fetch every configured source in order,
/// normalize, tag, filter by recency, deduplicate, sort, cap, and resolve
/// covers for the survivors.
///
/// A source failure contributes zero records and a warning; it never aborts
/// the topic or the run.
#[instrument(level = "info", skip_all, fields(topic = %topic.key))]
pub async fn assemble_topic(
    topic: &TopicConfig,
    tagging: &TaggerConfig,
    today: NaiveDate,
) -> Bucket {
    let mut raw = Vec::new();
    for source in &topic.sources {
        match sources::fetch(source, topic.lookback_days, today).await {
            Ok(mut records) => {
                info!(
                    source = %source.label(),
                    count = records.len(),
                    "Fetched source records"
                );
                raw.append(&mut records);
            }
            Err(e) => {
                warn!(
                    source = %source.label(),
                    error = %e,
                    "Source fetch failed; continuing with zero records"
                );
            }
        }
    }

    let mut items: Vec<Item> = raw
        .into_iter()
        .filter_map(|record| normalize::to_item(record, today))
        .collect();
    for item in &mut items {
        tagger::apply_tags(item, &topic.key, tagging);
    }
    items.retain(|item| is_recent(&item.time, today, topic.lookback_days));

    let mut items = finalize(dedupe(items), topic.max_items);

    // Covers last: the resolver costs a page fetch per item, so only items
    // that made the cut and arrived without embedded media pay for one.
    for item in &mut items {
        if item.cover.is_empty() {
            item.cover = cover::resolve_cover(&item.url).await;
        }
    }

    Bucket {
        key: topic.key.clone(),
        title: topic.title.clone(),
        items,
    }
}
