//! Result writers.
//!
//! This module renders [`PipelineResults`](crate::core::PipelineResults)
//! (or any JSON object) to text:
//! - [`to_json`] / [`write_json`] - pretty JSON, always available
//! - [`to_csv`] / [`write_csv`] - one header row and one data row - requires `csv-output` feature
//! - [`to_yaml`] / [`write_yaml`] - YAML document - requires `yaml-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case | Nested data |
//! |--------|----------|-------------|
//! | JSON | Piping, APIs | Yes |
//! | CSV | Spreadsheets | Only with `unchecked` |
//! | YAML | Reading by hand | Yes |
//!
//! # Example
//!
//! ```rust
//! use email_scraper::core::output::to_json;
//! use serde_json::json;
//!
//! let results = json!({"statistics": {"total_messages": 2}});
//! let text = to_json(results.as_object().unwrap())?;
//! assert!(text.contains("\"total_messages\": 2"));
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
#[cfg(feature = "yaml-output")]
mod yaml_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};
#[cfg(feature = "yaml-output")]
pub use yaml_writer::{to_yaml, write_yaml};
