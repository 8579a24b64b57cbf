//! Paper parser: runs the full pipeline over one document.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::detect::{detect_source_format, SourceFormat};
use crate::error::{Error, Result};
use crate::model::ParsedPaper;

use super::block::BlockParser;
use super::citation::resolve_citations;
use super::collect::collect_blocks;
use super::dom::Dom;
use super::markdown::markdown_to_html;
use super::noise::remove_global_noise;
use super::options::{ErrorMode, ParseOptions};
use super::preprocess::preprocess;
use super::root::select_root;
use super::structure::StructureBuilder;
use super::text;

/// Bilingual paper parser.
///
/// Parsing is a pure function of the raw input, the base reference and the
/// options: identical calls yield identical paragraph ids and content.
#[derive(Debug, Clone, Default)]
pub struct PaperParser {
    options: ParseOptions,
}

impl PaperParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse raw markup into paragraphs and structure.
    ///
    /// `base_reference` is only used to resolve relative image sources.
    /// In lenient mode every failure degrades to a single fallback paragraph;
    /// in strict mode the error is returned.
    pub fn parse(&self, raw: &str, base_reference: &str) -> Result<ParsedPaper> {
        let outcome = self.check_size(raw).and_then(|_| {
            panic::catch_unwind(AssertUnwindSafe(|| self.run(raw, base_reference)))
                .map_err(|payload| Error::Parse(panic_message(payload.as_ref())))
        });

        match outcome {
            Ok(paper) => Ok(paper),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Falling back to a single paragraph: {}", e);
                Ok(ParsedPaper::fallback(raw, self.options.fallback_max_chars))
            }
            Err(e) => Err(e),
        }
    }

    fn check_size(&self, raw: &str) -> Result<()> {
        match self.options.max_input_bytes {
            Some(limit) if raw.len() > limit => Err(Error::InputTooLarge {
                size: raw.len(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    fn run(&self, raw: &str, base_reference: &str) -> ParsedPaper {
        let options = &self.options;

        let converted;
        let mut html: &str = raw;
        if options.detect_light_markup && detect_source_format(raw) == SourceFormat::LightMarkup {
            converted = markdown_to_html(raw);
            html = &converted;
        }

        let reduced;
        if options.preprocess {
            reduced = preprocess(html).0;
            html = &reduced;
        }

        let mut dom = Dom::parse_document(html);
        remove_global_noise(&mut dom, &options.matcher);
        let root = select_root(&dom, &options.matcher);
        let blocks = collect_blocks(&dom, root, &options.matcher);

        let block_parser = BlockParser::new(&options.matcher, base_reference)
            .with_dedup_prefix_chars(options.dedup_prefix_chars);
        let mut seen: HashSet<String> = HashSet::new();
        let mut structure = StructureBuilder::new();
        let mut paragraphs = Vec::with_capacity(blocks.len());
        let mut duplicates = 0;

        for block in blocks {
            let Some(parsed) = block_parser.parse(&dom, block) else {
                continue;
            };
            if !seen.insert(parsed.signature.clone()) {
                duplicates += 1;
                continue;
            }
            let paragraph = parsed.into_paragraph(paragraphs.len());
            structure.push(&paragraph);
            paragraphs.push(paragraph);
        }
        log::debug!(
            "parse: {} paragraphs, {} duplicates dropped",
            paragraphs.len(),
            duplicates
        );

        if paragraphs.is_empty() {
            let visible = text::normalize(&dom.visible_text(dom.root()));
            let source = if visible.is_empty() { raw } else { visible.as_str() };
            log::warn!("No content blocks found, emitting a fallback paragraph");
            return ParsedPaper::fallback(source, options.fallback_max_chars);
        }

        resolve_citations(&mut paragraphs);

        ParsedPaper {
            paragraphs,
            structure: structure.finish(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParagraphType;

    #[test]
    fn test_parse_simple_document() {
        let paper = PaperParser::new()
            .parse("<html><body><h1>Title</h1><p>Body text.</p></body></html>", "")
            .unwrap();
        assert_eq!(paper.len(), 2);
        assert_eq!(paper.paragraphs[0].paragraph_type, ParagraphType::Heading);
        assert_eq!(paper.paragraphs[1].index, 1);
        assert_eq!(paper.structure.toc.len(), 1);
    }

    #[test]
    fn test_strict_size_limit() {
        let parser = PaperParser::with_options(ParseOptions::new().strict().with_max_input_bytes(4));
        let err = parser.parse("<p>too long</p>", "").unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { size: 15, limit: 4 }));
    }

    #[test]
    fn test_lenient_size_limit_falls_back() {
        let parser = PaperParser::with_options(
            ParseOptions::new()
                .with_max_input_bytes(4)
                .with_fallback_max_chars(6),
        );
        let paper = parser.parse("<p>too long</p>", "").unwrap();
        assert_eq!(paper.len(), 1);
        assert_eq!(paper.paragraphs[0].en_text, "&lt;p&gt;too");
    }

    #[test]
    fn test_no_blocks_uses_visible_text() {
        let paper = PaperParser::new()
            .parse("<html><body>loose  words &amp; more</body></html>", "")
            .unwrap();
        assert_eq!(paper.len(), 1);
        assert_eq!(paper.paragraphs[0].en_text, "loose words &amp; more");
    }

    #[test]
    fn test_no_visible_text_uses_raw_input() {
        let paper = PaperParser::new().parse("<html><body> </body></html>", "").unwrap();
        assert_eq!(paper.len(), 1);
        assert!(paper.paragraphs[0].en_text.starts_with("&lt;html&gt;"));
    }

    #[test]
    fn test_light_markup_conversion_toggle() {
        let raw = "# Title\n\nBody";
        let converted = PaperParser::new().parse(raw, "").unwrap();
        assert_eq!(converted.paragraphs[0].paragraph_type, ParagraphType::Heading);

        let parser =
            PaperParser::with_options(ParseOptions::new().with_light_markup_detection(false));
        let literal = parser.parse(raw, "").unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal.paragraphs[0].plain_text(crate::model::Language::Primary), "# Title Body");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }
}
