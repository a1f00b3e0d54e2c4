//! YAML output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::PipelineResults;
use crate::error::Result;

/// Writes results to a YAML file.
pub fn write_yaml(results: &PipelineResults, output_path: &Path) -> Result<()> {
    let yaml = to_yaml(results)?;
    let mut file = File::create(output_path)?;
    file.write_all(yaml.as_bytes())?;
    Ok(())
}

/// Converts results to a YAML document string.
pub fn to_yaml(results: &PipelineResults) -> Result<String> {
    Ok(serde_yaml::to_string(results)?)
}
