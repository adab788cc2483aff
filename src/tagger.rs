//! Keyword and host-based topical labeling.
//!
//! An item earns a label when any of the label's keywords appears as a
//! case-insensitive substring of its title + summary. Hosts on the known
//! preprint and journal-publisher lists contribute "Preprint" and "Journal"
//! labels. Adapter-supplied base tags are merged in, then the whole set is
//! deduplicated and sorted so output order is deterministic.

use itertools::Itertools;

use crate::config::TaggerConfig;
use crate::models::Item;
use crate::utils::host_of;

/// Populate an item's tag set for the given topic.
pub fn apply_tags(item: &mut Item, topic_key: &str, config: &TaggerConfig) {
    let haystack = format!("{} {}", item.title, item.summary).to_lowercase();
    let mut tags = std::mem::take(&mut item.tags);

    if let Some(rules) = config.rules.get(topic_key) {
        for rule in rules {
            let hit = rule
                .keywords
                .iter()
                .any(|k| haystack.contains(&k.to_lowercase()));
            if hit {
                tags.push(rule.label.clone());
            }
        }
    }

    if let Some(host) = host_of(&item.url) {
        if host_in(&host, &config.preprint_hosts) {
            tags.push("Preprint".to_string());
        }
        if host_in(&host, &config.journal_hosts) {
            tags.push("Journal".to_string());
        }
    }

    item.tags = tags.into_iter().unique().sorted().collect();
}

/// True when `host` equals an entry or is a subdomain of one.
fn host_in(host: &str, known: &[String]) -> bool {
    known
        .iter()
        .any(|k| host == k.as_str() || host.ends_with(&format!(".{k}")))
}
