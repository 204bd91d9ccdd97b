//! Schema validation with detailed error reporting

use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::identity::RecordPrefix;
use crate::schema::registry::SchemaRegistry;

/// Validation error with source location information
#[derive(Debug, Error, Diagnostic)]
#[error("Schema validation failed: {summary}")]
#[diagnostic(code(mingle::schema::validation_error))]
pub struct ValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }
}

impl ValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    /// Get the number of violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Record validator with compiled schemas
pub struct Validator {
    /// Compiled JSON schemas by record prefix
    compiled: HashMap<RecordPrefix, JsonValidator>,
}

impl Validator {
    /// Create a new validator with schemas from the registry
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for prefix in RecordPrefix::all() {
            if let Some(schema_str) = registry.get(*prefix) {
                if let Ok(schema_json) = serde_json::from_str::<JsonValue>(&schema_str) {
                    if let Ok(compiled_schema) = validator_for(&schema_json) {
                        compiled.insert(*prefix, compiled_schema);
                    }
                }
            }
        }

        Self { compiled }
    }

    /// Validate YAML content against the schema for the given record type,
    /// collecting every violation
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        prefix: RecordPrefix,
    ) -> Result<(), ValidationError> {
        // First parse YAML to a value
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = SchemaViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check YAML syntax - proper indentation, colons, quotes".to_string()),
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        // Convert YAML value to JSON value for schema validation
        let json_value: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                let violation = SchemaViolation::new(
                    format!("Failed to convert YAML to JSON: {}", e),
                    "conversion error".to_string(),
                    (0, content.len()).into(),
                    None,
                );
                return Err(ValidationError::new(filename, content, vec![violation]));
            }
        };

        // Get compiled schema; no schema means validation passes
        let Some(schema) = self.compiled.get(&prefix) else {
            return Ok(());
        };

        let violations: Vec<SchemaViolation> = schema
            .iter_errors(&json_value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(filename, content, violations))
        }
    }

    /// Validate a file directly, inferring the record type from its path
    pub fn validate_file(&self, path: &std::path::Path) -> Result<(), ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::new(
                &path.to_string_lossy(),
                "",
                vec![SchemaViolation::new(
                    format!("Cannot read file: {}", e),
                    "unreadable".to_string(),
                    (0, 0).into(),
                    None,
                )],
            )
        })?;
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        let prefix =
            RecordPrefix::from_filename(&filename).or_else(|| RecordPrefix::from_path(path));

        match prefix {
            Some(p) => self.validate(&content, &filename, p),
            None => Ok(()), // Unknown record type - skip
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        let registry = SchemaRegistry;
        Self::new(&registry)
    }
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let message = format_schema_error(error);
    let hint = format_error_hint(error);
    let help = generate_help_message(error);

    // Try to find the span in the YAML where this error occurred
    let span = find_path_span(content, &path);

    SchemaViolation::new(message, hint, span, help)
}

/// Format a JSON Schema error into a user-friendly message
fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "document root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", prop_str, path)
        }
        jsonschema::error::ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        jsonschema::error::ValidationErrorKind::Pattern { pattern } => {
            format!("Value at {} doesn't match pattern: {}", path, pattern)
        }
        jsonschema::error::ValidationErrorKind::MinLength { limit } => {
            format!("Value at {} is too short: minimum {} characters", path, limit)
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => {
            format!("Validation error at {}: {}", path, error)
        }
    }
}

/// Generate a short hint for the error label
fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { .. } => {
            "required field missing".to_string()
        }
        jsonschema::error::ValidationErrorKind::Type { .. } => "wrong type".to_string(),
        jsonschema::error::ValidationErrorKind::Pattern { .. } => "pattern mismatch".to_string(),
        jsonschema::error::ValidationErrorKind::MinLength { .. } => "too short".to_string(),
        jsonschema::error::ValidationErrorKind::AdditionalProperties { .. } => {
            "unknown field".to_string()
        }
        _ => "validation error".to_string(),
    }
}

/// Generate a help message with suggestions for fixing the error
fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        jsonschema::error::ValidationErrorKind::Required { property } => {
            let prop_str = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field to your file", prop_str))
        }
        jsonschema::error::ValidationErrorKind::Pattern { pattern } => {
            if pattern.contains('@') {
                Some("Email addresses look like name@example.com".to_string())
            } else if pattern.contains("USR-") || pattern.contains("INT-") {
                Some(
                    "ID format: PREFIX-[26 character ULID], e.g., USR-01HC2JB7SMQX7RS1Y0GFKBHPTD"
                        .to_string(),
                )
            } else {
                None
            }
        }
        jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
            if unexpected.iter().any(|f| f == "password") {
                Some("Plaintext passwords are never stored; remove the 'password' field".to_string())
            } else if unexpected.len() == 1 {
                Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
            } else {
                Some("Remove unknown fields or check spelling".to_string())
            }
        }
        _ => None,
    }
}

/// Find the span (byte offset, length) for an error location
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    if let Some(loc) = location {
        let line = loc.line().saturating_sub(1);
        let column = loc.column().saturating_sub(1);

        // Calculate byte offset
        let mut offset = 0;
        for (i, line_content) in content.lines().enumerate() {
            if i == line {
                offset += column;
                break;
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        // Find a reasonable span length (rest of line)
        let rest_of_content = &content[offset.min(content.len())..];
        let len = rest_of_content
            .find('\n')
            .unwrap_or(rest_of_content.len())
            .max(1);

        (offset, len).into()
    } else {
        // No location - highlight first line
        let len = content.find('\n').unwrap_or(content.len()).max(1);
        (0, len).into()
    }
}

/// Find the span for a JSON path in YAML content
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    let parts: Vec<&str> = json_path.split('/').filter(|s| !s.is_empty()).collect();

    // Root path or no usable key - highlight the first line
    let Some(search_key) = parts.last().filter(|k| k.parse::<usize>().is_err()) else {
        let key = parts
            .iter()
            .rev()
            .find(|k| k.parse::<usize>().is_err())
            .copied();
        return match key.and_then(|k| find_key_span(content, k)) {
            Some(span) => span,
            None => {
                let len = content.find('\n').unwrap_or(content.len()).max(1);
                (0, len).into()
            }
        };
    };

    find_key_span(content, search_key).unwrap_or_else(|| {
        let len = content.find('\n').unwrap_or(content.len()).max(1);
        (0, len).into()
    })
}

/// Find the span of a top-level-or-nested `key:` line in YAML content
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let needle = format!("{}:", key);
    let mut offset = 0;

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&needle) {
            let indent = line.len() - trimmed.len();
            return Some((offset + indent, line.len().saturating_sub(indent).max(1)).into());
        }
        offset += line.len() + 1;
    }
    None
}
