//! Output generation for the daily snapshot.
//!
//! One run produces exactly two artifacts under the output directory:
//!
//! ```text
//! output_dir/
//! ├── 2025-08-30.json   # structured snapshot for API consumption
//! └── 2025-08-30.md     # human-readable digest
//! ```
//!
//! - [`json`]: `{ "date": ..., "items": { "<topic>": [Item, ...] } }`
//! - [`markdown`]: one section per topic, empty topics get an explicit
//!   placeholder rather than being omitted

pub mod json;
pub mod markdown;
