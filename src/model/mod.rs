//! Document model types for parsed papers.
//!
//! This module defines the value types produced by the parser: paragraphs
//! with their bilingual text and sentence alignment, citation markers, and
//! the heading/figure/table indices. All types serialize to camelCase JSON
//! so callers can cache them.

mod document;
mod paragraph;
mod structure;

pub use document::ParsedPaper;
pub use paragraph::{
    Citation, Language, ParagraphData, ParagraphMetadata, ParagraphType, Sentence,
};
pub use structure::{FigureEntry, PaperStructure, TableEntry, TocEntry};
