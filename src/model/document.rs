//! Document-level types.

use super::{Language, PaperStructure, ParagraphData, ParagraphType};
use crate::parser::{escape_html, hash};
use serde::{Deserialize, Serialize};

/// A parsed paper: the paragraph list plus its structure index.
///
/// Callers treat this as immutable value data. Edits replace whole
/// paragraphs by id so every other id stays valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPaper {
    /// Paragraphs in document order
    pub paragraphs: Vec<ParagraphData>,

    /// Heading, figure and table indices
    pub structure: PaperStructure,
}

impl ParsedPaper {
    /// Create an empty paper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the single-paragraph fallback record for text that could not be parsed.
    ///
    /// The text is truncated to `max_chars` characters and HTML-escaped into
    /// `enText`; the sentence pair carries the unescaped text.
    pub fn fallback(text: &str, max_chars: usize) -> Self {
        let bounded: String = text.trim().chars().take(max_chars).collect();
        let signature = format!(
            "{}|p|{}",
            ParagraphType::Text,
            bounded.to_lowercase().chars().take(220).collect::<String>()
        );
        let id = hash::paragraph_id(&signature, 0);

        let mut paragraph = ParagraphData::with_text(id, 0, escape_html(&bounded));
        if let Some(sentence) = paragraph.sentences.first_mut() {
            sentence.en = bounded;
        }

        Self {
            paragraphs: vec![paragraph],
            structure: PaperStructure::new(),
        }
    }

    /// Get the number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the paper has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Get a paragraph by id.
    pub fn paragraph(&self, id: &str) -> Option<&ParagraphData> {
        self.paragraphs.iter().find(|p| p.id == id)
    }

    /// Get the position of a paragraph by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.paragraphs.iter().position(|p| p.id == id)
    }

    /// Replace the paragraph with the same id, returning the previous value.
    ///
    /// The replacement keeps the original `index`; other paragraphs and the
    /// structure index are untouched.
    pub fn replace_paragraph(&mut self, mut replacement: ParagraphData) -> Option<ParagraphData> {
        let pos = self.position(&replacement.id)?;
        replacement.index = self.paragraphs[pos].index;
        Some(std::mem::replace(&mut self.paragraphs[pos], replacement))
    }

    /// Paragraphs flagged as bibliography content.
    pub fn references(&self) -> impl Iterator<Item = &ParagraphData> {
        self.paragraphs.iter().filter(|p| p.is_reference)
    }

    /// Count citation markers that point at a bibliography entry.
    pub fn resolved_citation_count(&self) -> usize {
        self.paragraphs
            .iter()
            .flat_map(|p| p.citations.iter())
            .filter(|c| c.is_resolved())
            .count()
    }

    /// Get plain text of the entire paper in one language.
    pub fn plain_text(&self, language: Language) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text(language))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
