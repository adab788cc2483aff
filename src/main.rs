//! # Biomed News
//!
//! A daily aggregation pipeline for AI-in-biomedicine, microfluidics, and
//! bioinformatics publications. Each run fetches from PubMed, arXiv, and
//! syndicated journal feeds, normalizes everything into one item shape,
//! tags, filters by recency, deduplicates, and writes a dated snapshot as
//! JSON and Markdown.
//!
//! ## Usage
//!
//! ```sh
//! biomed_news --output-dir ./public/data
//! ```
//!
//! ## Architecture
//!
//! One batch run, sequential end to end:
//! 1. **Fetch**: each topic's sources are queried in configured order
//! 2. **Normalize & tag**: raw records become tagged items with JST dates
//! 3. **Filter & dedupe**: recency window, then first-occurrence-wins dedup
//! 4. **Output**: `<date>.json` and `<date>.md` under the output directory
//!
//! A failing source contributes zero records and a warning; only an output
//! write failure is fatal.

use clap::Parser;
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod cover;
mod http;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod sources;
mod tagger;
mod utils;

use cli::Cli;
use config::AppConfig;
use models::Snapshot;
use outputs::{json, markdown};
use utils::{ensure_writable_dir, today_reference};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("biomed_news starting up");

    let args = Cli::parse();
    let config = AppConfig::default_config();

    // Early check: fail before any network time is spent.
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let today = today_reference();
    let mut snapshot = Snapshot {
        date: today.to_string(),
        buckets: Vec::new(),
    };
    info!(date = %snapshot.date, topics = config.topics.len(), "Snapshot initialized");

    // ---- Assemble topic buckets, one source at a time ----
    for topic in &config.topics {
        let bucket = pipeline::assemble_topic(topic, &config.tagging, today).await;
        info!(topic = %bucket.key, count = bucket.items.len(), "Assembled topic bucket");
        snapshot.buckets.push(bucket);
    }

    // ---- Write outputs; a write failure here is fatal ----
    json::write_snapshot(&snapshot, &args.output_dir).await?;

    let md = markdown::snapshot_to_markdown(&snapshot);
    let md_path = format!(
        "{}/{}.md",
        args.output_dir.trim_end_matches('/'),
        snapshot.date
    );
    tokio::fs::write(&md_path, md).await?;
    info!(path = %md_path, "Wrote Markdown digest");

    let counts = snapshot
        .buckets
        .iter()
        .map(|b| format!("{}: {}", b.key, b.items.len()))
        .collect::<Vec<_>>()
        .join(" | ");
    let elapsed = start_time.elapsed();
    info!(
        %counts,
        total = snapshot.total_items(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
