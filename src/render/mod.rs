//! Rendering module for converting parsed papers to output formats.

mod json;
mod markdown;
mod options;
mod result;
mod text;
pub mod visitor;

pub use json::{from_json, to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, to_markdown_with_visitor, MarkdownRenderer};
pub use options::{LanguageSelection, RenderOptions};
pub use result::{ExtractionStats, RenderResult};
pub use text::to_text;
pub use visitor::{CompositeVisitor, DefaultVisitor, DocumentVisitor, VisitorAction};
