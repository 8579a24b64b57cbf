//! Source format detection.

use std::sync::LazyLock;

use regex::Regex;

/// Format of a raw input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// Tagged markup, parsed directly
    #[default]
    Html,
    /// Lightweight Markdown-like markup, converted before parsing
    LightMarkup,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Html => write!(f, "HTML"),
            SourceFormat::LightMarkup => write!(f, "light markup"),
        }
    }
}

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]").expect("hardcoded regex is valid"));

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]").expect("hardcoded regex is valid")
});

static TABLE_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\|.*\|[ \t]*$").expect("hardcoded regex is valid"));

static STRUCTURAL_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<(?:html|head|body|div|p|span|section|article|table|h[1-6]|ul|ol|li|br|img)[\s>/]",
    )
    .expect("hardcoded regex is valid")
});

/// Detect whether raw input is tagged markup or lightweight markup.
///
/// # Arguments
/// * `text` - Raw input document
///
/// # Returns
/// * `SourceFormat::LightMarkup` if the text has heading, list or table-row
///   markers and no opening tag of a common structural element
/// * `SourceFormat::Html` otherwise
///
/// # Example
/// ```
/// use unpaper::detect::{detect_source_format, SourceFormat};
///
/// assert_eq!(detect_source_format("# Title\n\nBody"), SourceFormat::LightMarkup);
/// assert_eq!(detect_source_format("<p>Body</p>"), SourceFormat::Html);
/// ```
pub fn detect_source_format(text: &str) -> SourceFormat {
    if STRUCTURAL_TAG_RE.is_match(text) {
        return SourceFormat::Html;
    }

    if HEADING_RE.is_match(text) || LIST_RE.is_match(text) || TABLE_ROW_RE.is_match(text) {
        SourceFormat::LightMarkup
    } else {
        SourceFormat::Html
    }
}

/// Check if raw input should be converted before parsing.
pub fn is_light_markup(text: &str) -> bool {
    detect_source_format(text) == SourceFormat::LightMarkup
}
