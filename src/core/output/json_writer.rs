//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::PipelineResults;
use crate::error::Result;

/// Writes results to a JSON file.
///
/// # Format
/// ```json
/// {
///   "statistics": {
///     "total_messages": 2
///   }
/// }
/// ```
pub fn write_json(results: &PipelineResults, output_path: &Path) -> Result<()> {
    let json = to_json(results)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts results to a pretty-printed JSON string (2-space indent).
pub fn to_json(results: &PipelineResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn sample() -> PipelineResults {
        json!({
            "statistics": {
                "total_messages": 2,
                "unique_senders": 2,
                "top_senders": {"sender1@example.com": 1, "sender2@example.com": 1},
                "date_range": {
                    "start": "2023-01-01T10:00:00+00:00",
                    "end": "2023-01-02T11:00:00+00:00"
                },
                "top_subjects": {"Test Subject 1": 1, "Test Subject 2": 1}
            }
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_to_json_round_trips() {
        let results = sample();
        let text = to_json(&results).unwrap();
        let parsed: PipelineResults = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, results);
        assert!(text.contains("\n  \"statistics\""));
    }

    #[test]
    fn test_write_json_file() {
        let results = sample();
        let temp_file = NamedTempFile::new().unwrap();

        write_json(&results, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: PipelineResults = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, results);
    }
}
