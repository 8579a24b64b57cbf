//! JSON rendering for parsed papers.

use crate::error::{Error, Result};
use crate::model::ParsedPaper;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a paper to JSON.
///
/// The output is the `{ paragraphs, structure }` record with camelCase keys,
/// suitable for caching under [`crate::content_key`].
pub fn to_json(paper: &ParsedPaper, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(paper)?,
        JsonFormat::Compact => serde_json::to_string(paper)?,
    };
    Ok(json)
}

/// Restore a paper from JSON produced by [`to_json`].
///
/// Malformed input is a [`Error::Parse`], not a rendering failure.
pub fn from_json(json: &str) -> Result<ParsedPaper> {
    serde_json::from_str(json).map_err(|e| Error::Parse(format!("JSON deserialization error: {}", e)))
}
