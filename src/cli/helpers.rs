//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::directory::MemberDirectory;
use crate::core::identity::RecordId;

/// Open the membership directory named by `--directory`, or discover it by
/// walking up from the current directory
pub fn open_directory(global: &GlobalOpts) -> Result<MemberDirectory> {
    let result = match &global.directory {
        Some(path) => MemberDirectory::open(path),
        None => MemberDirectory::discover(),
    };
    result.map_err(|e| miette::miette!("{}", e))
}

/// Resolve the effective output format: an explicit `--format` wins,
/// otherwise the configured default, otherwise `Auto`
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(parse_format)
        .unwrap_or(OutputFormat::Auto)
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s.to_lowercase().as_str() {
        "auto" => Some(OutputFormat::Auto),
        "table" => Some(OutputFormat::Table),
        "yaml" => Some(OutputFormat::Yaml),
        "json" => Some(OutputFormat::Json),
        "id" => Some(OutputFormat::Id),
        _ => None,
    }
}

/// Format a RecordId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
/// This provides a consistent display format across all list outputs.
pub fn format_short_id(id: &RecordId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
