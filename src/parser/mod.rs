//! Bilingual paper parsing pipeline.
//!
//! Stages run in order: light-markup conversion, string preprocessing,
//! tree construction, global noise removal, root selection, block
//! collection, per-block parsing, structure accumulation and citation
//! resolution.

mod block;
mod citation;
mod collect;
mod dom;
pub mod hash;
mod markdown;
mod matcher;
mod noise;
mod options;
mod paper_parser;
mod preprocess;
mod root;
mod sanitize;
mod sentence;
mod structure;
mod text;

pub use block::{base_directory, resolve_src, BlockParser, ParsedBlock, DEFAULT_DEDUP_PREFIX_CHARS};
pub use citation::{extract_citations, is_reference_text, resolve_citations};
pub use dom::{escape_html, Dom, NodeId};
pub use markdown::markdown_to_html;
pub use matcher::OverlayMatcher;
pub use options::{ErrorMode, ParseOptions, DEFAULT_FALLBACK_MAX_CHARS};
pub use paper_parser::PaperParser;
pub use preprocess::{preprocess, PreprocessStats};
pub use sentence::{align, split_sentences};
pub use structure::StructureBuilder;
