//! Navigation indices derived from the paragraph list.

use serde::{Deserialize, Serialize};

/// Derived indices over a parsed paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperStructure {
    /// Heading outline in document order
    pub toc: Vec<TocEntry>,

    /// Figures in document order
    pub figures: Vec<FigureEntry>,

    /// Tables in document order
    pub tables: Vec<TableEntry>,
}

impl PaperStructure {
    /// Create an empty structure index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no entries were collected.
    pub fn is_empty(&self) -> bool {
        self.toc.is_empty() && self.figures.is_empty() && self.tables.is_empty()
    }

    /// Find the TOC entry for a heading paragraph.
    pub fn heading_for(&self, paragraph_id: &str) -> Option<&TocEntry> {
        self.toc.iter().find(|e| e.paragraph_id == paragraph_id)
    }

    /// Drop entries whose paragraph is no longer present.
    pub fn retain_paragraphs<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.toc.retain(|e| keep(&e.paragraph_id));
        self.figures.retain(|e| keep(&e.paragraph_id));
        self.tables.retain(|e| keep(&e.paragraph_id));
    }
}

/// A heading in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Heading anchor id
    pub id: String,

    /// Heading text (primary language)
    pub text: String,

    /// Heading level (1-6)
    pub level: u8,

    /// Paragraph holding the heading
    pub paragraph_id: String,
}

/// A figure in the figure index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureEntry {
    /// 1-based figure number in document order
    pub number: usize,

    /// Paragraph holding the figure
    pub paragraph_id: String,

    /// Resolved image source
    pub src: String,

    /// Caption text (may be empty)
    pub caption: String,
}

/// A table in the table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    /// 1-based table number in document order
    pub number: usize,

    /// Paragraph holding the table
    pub paragraph_id: String,

    /// Caption text (may be empty)
    pub caption: String,
}
