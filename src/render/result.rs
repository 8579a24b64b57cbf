//! Rendering result with statistics.

use crate::model::{ParagraphType, ParsedPaper};
use serde::{Deserialize, Serialize};

/// Result of rendering a paper, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (Markdown, text, etc.)
    pub content: String,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            stats: ExtractionStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected from a parsed paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of paragraphs of any type
    pub paragraph_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of figures
    pub image_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Number of code blocks
    pub code_count: u32,

    /// Number of aligned sentence pairs
    pub sentence_count: u32,

    /// Paragraphs carrying a translation
    pub translated_count: u32,

    /// Citation markers found
    pub citation_count: u32,

    /// Citation markers linked to a bibliography entry
    pub resolved_citation_count: u32,

    /// Paragraphs in the bibliography
    pub reference_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over every paragraph of a paper.
    pub fn from_paper(paper: &ParsedPaper) -> Self {
        let mut stats = Self::new();
        for paragraph in &paper.paragraphs {
            stats.paragraph_count += 1;
            match paragraph.paragraph_type {
                ParagraphType::Heading => stats.heading_count += 1,
                ParagraphType::Image => stats.image_count += 1,
                ParagraphType::Table => stats.table_count += 1,
                ParagraphType::Code => stats.code_count += 1,
                ParagraphType::Text => {}
            }
            stats.sentence_count += paragraph.sentences.len() as u32;
            if paragraph.has_translation() {
                stats.translated_count += 1;
            }
            stats.citation_count += paragraph.citations.len() as u32;
            stats.resolved_citation_count +=
                paragraph.citations.iter().filter(|c| c.is_resolved()).count() as u32;
            if paragraph.is_reference {
                stats.reference_count += 1;
            }
        }
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Share of paragraphs with a translation, from 0.0 to 1.0.
    pub fn translation_coverage(&self) -> f64 {
        if self.paragraph_count == 0 {
            return 0.0;
        }
        self.translated_count as f64 / self.paragraph_count as f64
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExtractionStats) {
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.image_count += other.image_count;
        self.table_count += other.table_count;
        self.code_count += other.code_count;
        self.sentence_count += other.sentence_count;
        self.translated_count += other.translated_count;
        self.citation_count += other.citation_count;
        self.resolved_citation_count += other.resolved_citation_count;
        self.reference_count += other.reference_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Citation, ParagraphData};

    #[test]
    fn test_extraction_stats_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world! 안녕 하세요");

        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 17);
    }

    #[test]
    fn test_stats_from_paper() {
        let mut cited = ParagraphData::with_text("p-1", 0, "See [1].");
        cited.ko_text = "[1] 참조.".to_string();
        cited.citations = vec![Citation::new("[1]"), Citation::new("[2, 3]")];
        cited.citations[0].paragraph_id = Some("p-2".to_string());

        let mut reference = ParagraphData::with_text("p-2", 1, "[1] Entry.");
        reference.is_reference = true;

        let paper = ParsedPaper {
            paragraphs: vec![cited, reference],
            ..Default::default()
        };
        let stats = ExtractionStats::from_paper(&paper);

        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.sentence_count, 2);
        assert_eq!(stats.translated_count, 1);
        assert_eq!(stats.citation_count, 2);
        assert_eq!(stats.resolved_citation_count, 1);
        assert_eq!(stats.reference_count, 1);
        assert!((stats.translation_coverage() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = ExtractionStats {
            paragraph_count: 2,
            word_count: 10,
            ..Default::default()
        };
        let b = ExtractionStats {
            paragraph_count: 3,
            table_count: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.paragraph_count, 5);
        assert_eq!(a.table_count, 1);
        assert_eq!(a.word_count, 10);
    }
}
