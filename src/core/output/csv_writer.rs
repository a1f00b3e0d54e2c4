//! CSV output writer.

use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::config::FormatOptions;
use crate::core::PipelineResults;
use crate::error::{Result, ScraperError};

/// Writes results to a CSV file.
///
/// # Format
/// - Header: the top-level keys, in order
/// - One data row: strings as-is, `null` empty, everything else as compact JSON
/// - Delimiter: [`FormatOptions::delimiter`]
///
/// Unless [`FormatOptions::unchecked`] is set, an object or array value with
/// more than one element is rejected with [`ScraperError::NestedData`].
pub fn write_csv(results: &PipelineResults, output_path: &Path, options: &FormatOptions) -> Result<()> {
    check_flat(results, options)?;
    let file = File::create(output_path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(file);
    write_rows(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

/// Converts results to a CSV string.
pub fn to_csv(results: &PipelineResults, options: &FormatOptions) -> Result<String> {
    check_flat(results, options)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(Vec::new());
    write_rows(&mut writer, results)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ScraperError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScraperError::decoding("CSV output", e.utf8_error()))
}

fn check_flat(results: &PipelineResults, options: &FormatOptions) -> Result<()> {
    if options.unchecked {
        return Ok(());
    }
    for (key, value) in results {
        let nested = match value {
            Value::Object(map) => map.len() > 1,
            Value::Array(items) => items.len() > 1,
            _ => false,
        };
        if nested {
            return Err(ScraperError::NestedData { key: key.clone() });
        }
    }
    Ok(())
}

fn write_rows<W: std::io::Write>(writer: &mut csv::Writer<W>, results: &PipelineResults) -> Result<()> {
    writer.write_record(results.keys())?;
    writer.write_record(results.values().map(cell))?;
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
