//! Command-line interface.
//!
//! The pipeline runs with no required arguments; source lists, per-topic
//! caps, and lookback windows are compiled-in configuration. Only the output
//! location is a flag.

use clap::Parser;

/// Command-line arguments for the daily aggregation run.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory the dated JSON and Markdown snapshots are written to
    #[arg(short, long, default_value = "public/data")]
    pub output_dir: String,
}
