//! YAML parsing with source-labeled diagnostics

pub mod diagnostics;

pub use diagnostics::YamlSyntaxError;

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse a YAML file into a record, attaching a labeled diagnostic on
/// syntax errors
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_yml::from_str(&content).map_err(|e| {
        YamlSyntaxError::from_serde_error(&e, &content, &path.to_string_lossy()).into()
    })
}
