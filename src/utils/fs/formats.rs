//! Reading text and YAML files with path-carrying errors.

use anyhow::{Context, Result};
use std::path::Path;

/// Reads a UTF-8 text file.
///
/// # Errors
/// Returns an error naming the path if the file cannot be read
pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Reads and parses a YAML file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_yaml_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from file: {}", path.display()))
}
