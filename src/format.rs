//! Output formatters.
//!
//! A [`Formatter`] turns pipeline results into text and can save that text to
//! a file. The stock formatters are [`JsonFormatter`], [`CsvFormatter`] and
//! [`YamlFormatter`]; they are normally looked up by name through a
//! [`Registry`](crate::registry::Registry).
//!
//! # Example
//!
//! ```rust
//! use email_scraper::config::FormatOptions;
//! use email_scraper::format::{Formatter, JsonFormatter};
//! use serde_json::json;
//!
//! let results = json!({"statistics": {"total_messages": 0}});
//! let text = JsonFormatter.format(results.as_object().unwrap(), &FormatOptions::new())?;
//! assert!(text.starts_with('{'));
//! # Ok::<(), email_scraper::ScraperError>(())
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::config::FormatOptions;
use crate::core::PipelineResults;
use crate::core::output;
use crate::error::Result;

/// Renders results in one output format.
pub trait Formatter: Send + Sync {
    /// Registry key, e.g. `"json"`.
    fn name(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Default file extension (without dot).
    fn file_extension(&self) -> &'static str;

    /// Renders `results` as a string.
    fn format(&self, results: &PipelineResults, options: &FormatOptions) -> Result<String>;

    /// Renders `results` and writes them to `path`.
    fn save(&self, results: &PipelineResults, path: &Path, options: &FormatOptions) -> Result<()> {
        let text = self.format(results, options)?;
        let mut file = File::create(path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Format results as JSON"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn format(&self, results: &PipelineResults, _options: &FormatOptions) -> Result<String> {
        output::to_json(results)
    }

    fn save(&self, results: &PipelineResults, path: &Path, _options: &FormatOptions) -> Result<()> {
        output::write_json(results, path)
    }
}

/// Single-row CSV keyed by the top-level result names.
#[cfg(feature = "csv-output")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

#[cfg(feature = "csv-output")]
impl Formatter for CsvFormatter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn description(&self) -> &'static str {
        "Format results as CSV"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn format(&self, results: &PipelineResults, options: &FormatOptions) -> Result<String> {
        output::to_csv(results, options)
    }

    fn save(&self, results: &PipelineResults, path: &Path, options: &FormatOptions) -> Result<()> {
        output::write_csv(results, path, options)
    }
}

/// YAML document.
#[cfg(feature = "yaml-output")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormatter;

#[cfg(feature = "yaml-output")]
impl Formatter for YamlFormatter {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn description(&self) -> &'static str {
        "Format results as YAML"
    }

    fn file_extension(&self) -> &'static str {
        "yaml"
    }

    fn format(&self, results: &PipelineResults, _options: &FormatOptions) -> Result<String> {
        output::to_yaml(results)
    }

    fn save(&self, results: &PipelineResults, path: &Path, _options: &FormatOptions) -> Result<()> {
        output::write_yaml(results, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> PipelineResults {
        json!({"total_messages": 2, "unique_senders": 1})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_json_metadata() {
        assert_eq!(JsonFormatter.name(), "json");
        assert_eq!(JsonFormatter.file_extension(), "json");
        assert!(!JsonFormatter.description().is_empty());
    }

    #[test]
    fn test_json_save_matches_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let options = FormatOptions::new();

        JsonFormatter.save(&sample(), &path, &options).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, JsonFormatter.format(&sample(), &options).unwrap());
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_csv_formatter() {
        let text = CsvFormatter.format(&sample(), &FormatOptions::new()).unwrap();
        assert_eq!(text, "total_messages,unique_senders\n2,1\n");
    }

    #[cfg(feature = "yaml-output")]
    #[test]
    fn test_yaml_formatter() {
        let text = YamlFormatter.format(&sample(), &FormatOptions::new()).unwrap();
        assert_eq!(text, "total_messages: 2\nunique_senders: 1\n");
    }
}
