//! Accumulates the heading outline and figure/table indices.

use crate::model::{
    FigureEntry, Language, PaperStructure, ParagraphData, ParagraphType, TableEntry, TocEntry,
};

/// Builds a [`PaperStructure`] as paragraphs are emitted.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    structure: PaperStructure,
}

impl StructureBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a paragraph if it is a heading, figure or table.
    pub fn push(&mut self, paragraph: &ParagraphData) {
        match paragraph.paragraph_type {
            ParagraphType::Heading => {
                let mut text = paragraph.plain_text(Language::Primary);
                if text.is_empty() {
                    text = paragraph.plain_text(Language::Secondary);
                }
                self.structure.toc.push(TocEntry {
                    id: paragraph.metadata.anchor_id.clone().unwrap_or_default(),
                    text,
                    level: paragraph.metadata.level.unwrap_or(1),
                    paragraph_id: paragraph.id.clone(),
                });
            }
            ParagraphType::Image => {
                self.structure.figures.push(FigureEntry {
                    number: self.structure.figures.len() + 1,
                    paragraph_id: paragraph.id.clone(),
                    src: paragraph.metadata.src.clone().unwrap_or_default(),
                    caption: paragraph.metadata.caption.clone().unwrap_or_default(),
                });
            }
            ParagraphType::Table => {
                self.structure.tables.push(TableEntry {
                    number: self.structure.tables.len() + 1,
                    paragraph_id: paragraph.id.clone(),
                    caption: paragraph.metadata.caption.clone().unwrap_or_default(),
                });
            }
            ParagraphType::Text | ParagraphType::Code => {}
        }
    }

    /// Finish and return the accumulated indices.
    pub fn finish(self) -> PaperStructure {
        log::debug!(
            "structure: {} headings, {} figures, {} tables",
            self.structure.toc.len(),
            self.structure.figures.len(),
            self.structure.tables.len()
        );
        self.structure
    }
}
