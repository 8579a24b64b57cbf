//! # unpaper
//!
//! Bilingual academic paper parsing for Rust.
//!
//! This library turns the HTML of a research paper, with or without an
//! Immersive Translate overlay, into an ordered list of typed paragraphs.
//! Each paragraph carries sanitized primary and secondary markup, aligned
//! sentence pairs and citation markers linked to the bibliography. A
//! structure index (table of contents, figures, tables) is built alongside.
//!
//! ## Quick Start
//!
//! ```
//! use unpaper::{parse, render};
//!
//! fn main() -> unpaper::Result<()> {
//!     let html = r#"<article>
//!         <h2>Method</h2>
//!         <p>We train a model. We evaluate it.</p>
//!     </article>"#;
//!
//!     let paper = parse(html, "papers/2401.00001/index.html");
//!     assert_eq!(paper.structure.toc[0].text, "Method");
//!
//!     let markdown = render::to_markdown(&paper, &render::RenderOptions::default())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Overlay-aware**: translation wrappers are split into a primary/secondary pair
//! - **Stable ids**: paragraph ids derive from content, so re-parsing is idempotent
//! - **Sentence alignment**: pairwise when sentence counts agree
//! - **Citation linking**: numeric markers resolve to bibliography paragraphs
//! - **Light markup**: Markdown-style input is converted before parsing
//! - **Parallel batches**: Uses Rayon for independent documents
//! - **Never empty**: malformed input degrades to a single fallback paragraph

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_source_format, is_light_markup, SourceFormat};
pub use error::{Error, Result};
pub use model::{
    Citation, FigureEntry, Language, PaperStructure, ParagraphData, ParagraphMetadata,
    ParagraphType, ParsedPaper, Sentence, TableEntry, TocEntry,
};
pub use parser::{ErrorMode, OverlayMatcher, PaperParser, ParseOptions};
pub use render::{ExtractionStats, JsonFormat, LanguageSelection, RenderOptions};

use rayon::prelude::*;
use std::path::Path;

/// Parse a paper and return its paragraphs and structure.
///
/// This never fails: malformed input yields a single fallback paragraph
/// holding the escaped raw text.
///
/// # Arguments
///
/// * `raw` - HTML or light-markup source of the paper
/// * `base_reference` - Location of the source, used to resolve relative images
///
/// # Example
///
/// ```
/// use unpaper::parse;
///
/// let paper = parse("<p>Hello, world.</p>", "");
/// assert_eq!(paper.len(), 1);
/// ```
pub fn parse(raw: &str, base_reference: &str) -> ParsedPaper {
    let options = ParseOptions::default();
    let max_chars = options.fallback_max_chars;
    PaperParser::with_options(options)
        .parse(raw, base_reference)
        .unwrap_or_else(|_| ParsedPaper::fallback(raw, max_chars))
}

/// Parse a paper with custom options.
///
/// # Example
///
/// ```
/// use unpaper::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().strict().with_max_input_bytes(4);
/// assert!(parse_with_options("<p>too long</p>", "", options).is_err());
/// ```
pub fn parse_with_options(
    raw: &str,
    base_reference: &str,
    options: ParseOptions,
) -> Result<ParsedPaper> {
    PaperParser::with_options(options).parse(raw, base_reference)
}

/// Parse a paper from a file.
///
/// The file path is used as the base reference for relative image sources.
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Example
///
/// ```no_run
/// use unpaper::parse_file;
///
/// let paper = parse_file("paper/index.html").unwrap();
/// println!("Paragraphs: {}", paper.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedPaper> {
    parse_file_with_options(path, ParseOptions::default())
}

/// Parse a paper from a file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParsedPaper> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let raw = String::from_utf8_lossy(&bytes);
    let base_reference = path.to_string_lossy();
    log::debug!("Read {} bytes from {}", bytes.len(), base_reference);
    parse_with_options(&raw, &base_reference, options)
}

/// Parse independent papers in parallel.
///
/// Results are returned in input order and equal what [`parse`] returns for
/// each `(raw, base_reference)` pair.
///
/// # Example
///
/// ```
/// use unpaper::parse_batch;
///
/// let papers = parse_batch(&[("<p>One.</p>", ""), ("<p>Two.</p>", "")]);
/// assert_eq!(papers.len(), 2);
/// ```
pub fn parse_batch<R, B>(inputs: &[(R, B)]) -> Vec<ParsedPaper>
where
    R: AsRef<str> + Sync,
    B: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|(raw, base)| parse(raw.as_ref(), base.as_ref()))
        .collect()
}

/// Cache key for a raw document.
///
/// The MD5 hex digest of the input; identical inputs always share a key.
pub fn content_key(raw: &str) -> String {
    parser::hash::content_key(raw)
}

/// Builder for parsing and rendering papers.
///
/// # Example
///
/// ```
/// use unpaper::{LanguageSelection, Unpaper};
///
/// let markdown = Unpaper::new()
///     .with_language(LanguageSelection::Primary)
///     .skip_references()
///     .parse("<h1>Intro</h1><p>Text.</p>", "")?
///     .to_markdown()?;
/// assert!(markdown.starts_with("# Intro"));
/// # Ok::<(), unpaper::Error>(())
/// ```
pub struct Unpaper {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Unpaper {
    /// Create a new Unpaper builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Enable strict parsing mode.
    pub fn strict(mut self) -> Self {
        self.parse_options = self.parse_options.strict();
        self
    }

    /// Use a custom overlay matcher.
    pub fn with_matcher(mut self, matcher: OverlayMatcher) -> Self {
        self.parse_options = self.parse_options.with_matcher(matcher);
        self
    }

    /// Reject inputs larger than `bytes`.
    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.parse_options = self.parse_options.with_max_input_bytes(bytes);
        self
    }

    /// Select the output language(s).
    pub fn with_language(mut self, language: LanguageSelection) -> Self {
        self.render_options = self.render_options.with_language(language);
        self
    }

    /// Prepend a table of contents to Markdown output.
    pub fn with_toc(mut self) -> Self {
        self.render_options = self.render_options.with_toc(true);
        self
    }

    /// Leave bibliography paragraphs out of rendered output.
    pub fn skip_references(mut self) -> Self {
        self.render_options = self.render_options.with_skip_references(true);
        self
    }

    /// Parse raw markup and return a result wrapper.
    pub fn parse(self, raw: &str, base_reference: &str) -> Result<UnpaperResult> {
        let paper = parse_with_options(raw, base_reference, self.parse_options)?;
        Ok(UnpaperResult {
            paper,
            render_options: self.render_options,
        })
    }

    /// Parse a file and return a result wrapper.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<UnpaperResult> {
        let paper = parse_file_with_options(path, self.parse_options)?;
        Ok(UnpaperResult {
            paper,
            render_options: self.render_options,
        })
    }
}

impl Default for Unpaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a paper.
pub struct UnpaperResult {
    /// The parsed paper
    pub paper: ParsedPaper,
    /// Render options to use
    render_options: RenderOptions,
}

impl UnpaperResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.paper, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.paper, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.paper, format)
    }

    /// Collect statistics over the parsed paper.
    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats::from_paper(&self.paper)
    }

    /// Get the parsed paper.
    pub fn paper(&self) -> &ParsedPaper {
        &self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Builder Pattern Tests ====================

    #[test]
    fn test_unpaper_builder_default() {
        let builder = Unpaper::default();
        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.render_options.language, LanguageSelection::Both);
        assert!(!builder.render_options.include_toc);
    }

    #[test]
    fn test_unpaper_builder_chained() {
        let builder = Unpaper::new()
            .strict()
            .with_max_input_bytes(1024)
            .with_language(LanguageSelection::Secondary)
            .with_toc()
            .skip_references();

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Strict);
        assert_eq!(builder.parse_options.max_input_bytes, Some(1024));
        assert_eq!(builder.render_options.language, LanguageSelection::Secondary);
        assert!(builder.render_options.include_toc);
        assert!(builder.render_options.skip_references);
    }

    #[test]
    fn test_unpaper_strict_rejects_large_input() {
        let result = Unpaper::new()
            .strict()
            .with_max_input_bytes(4)
            .parse("<p>too long</p>", "");
        assert!(matches!(result, Err(Error::InputTooLarge { .. })));
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_empty_input() {
        let paper = parse("", "");
        assert_eq!(paper.len(), 1);
        assert_eq!(paper.paragraphs[0].paragraph_type, ParagraphType::Text);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/paper.html");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_content_key_stable() {
        let a = content_key("<p>Hello</p>");
        assert_eq!(a, content_key("<p>Hello</p>"));
        assert_ne!(a, content_key("<p>Hello!</p>"));
        assert_eq!(a.len(), 32);
    }

    // ==================== Output Format Tests ====================

    #[test]
    fn test_result_outputs() {
        let result = Unpaper::new()
            .parse("<h2>Results</h2><p>It works.</p>", "")
            .unwrap();

        assert!(result.to_markdown().unwrap().starts_with("## Results"));
        assert!(result.to_text().unwrap().contains("It works."));
        assert!(result
            .to_json(JsonFormat::Compact)
            .unwrap()
            .contains("\"toc\""));

        let stats = result.stats();
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 2);
    }
}
