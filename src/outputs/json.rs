//! JSON snapshot output.
//!
//! The topic map is keyed by bucket key in sorted order; item fields keep the
//! declaration order of [`Item`](crate::models::Item). Text is written as
//! UTF-8 without ASCII escaping, so non-Latin titles survive readable.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

use crate::models::{Item, Snapshot};

#[derive(Serialize)]
struct SnapshotJson<'a> {
    date: &'a str,
    items: BTreeMap<&'a str, &'a [Item]>,
}

/// Serialize a snapshot to its JSON form.
pub fn render_snapshot(snapshot: &Snapshot) -> Result<String, Box<dyn Error>> {
    let items: BTreeMap<&str, &[Item]> = snapshot
        .buckets
        .iter()
        .map(|bucket| (bucket.key.as_str(), bucket.items.as_slice()))
        .collect();
    let payload = SnapshotJson {
        date: &snapshot.date,
        items,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Write `<output_dir>/<date>.json`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_snapshot(snapshot: &Snapshot, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = render_snapshot(snapshot)?;
    fs::create_dir_all(output_dir).await?;
    let path = format!("{}/{}.json", output_dir.trim_end_matches('/'), snapshot.date);
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote JSON snapshot");
    Ok(())
}
