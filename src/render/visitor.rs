//! Visitor pattern for customizing paper rendering.
//!
//! The visitor pattern allows users to customize how different paragraphs
//! are rendered without modifying the core rendering logic.
//!
//! # Example
//!
//! ```
//! use unpaper::render::visitor::{DocumentVisitor, VisitorAction};
//! use unpaper::model::ParagraphData;
//!
//! struct CustomTableVisitor;
//!
//! impl DocumentVisitor for CustomTableVisitor {
//!     fn visit_table(&mut self, _table: &ParagraphData) -> VisitorAction {
//!         // Replace every table with a placeholder
//!         VisitorAction::Replace("<!-- table omitted -->".to_string())
//!     }
//! }
//! ```

use crate::model::ParagraphData;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the element with custom output.
    Replace(String),

    /// Skip this element entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the element should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting paragraphs during rendering.
///
/// `visit_paragraph` is called first for every paragraph; the type-specific
/// method is only consulted when it returns `Continue`. All methods return
/// `VisitorAction::Continue` by default.
pub trait DocumentVisitor: Send + Sync {
    /// Called before rendering any paragraph.
    ///
    /// # Arguments
    /// * `para` - The paragraph about to be rendered
    ///
    /// # Returns
    /// Action indicating how to handle this paragraph
    fn visit_paragraph(&mut self, para: &ParagraphData) -> VisitorAction {
        let _ = para;
        VisitorAction::Continue
    }

    /// Called before rendering a heading.
    ///
    /// # Arguments
    /// * `text` - The heading text in the primary language
    /// * `level` - Heading level (1-6)
    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        let _ = (text, level);
        VisitorAction::Continue
    }

    /// Called before rendering a figure.
    ///
    /// # Arguments
    /// * `src` - Resolved image source
    /// * `alt` - Optional alt text for the image
    fn visit_image(&mut self, src: &str, alt: Option<&str>) -> VisitorAction {
        let _ = (src, alt);
        VisitorAction::Continue
    }

    /// Called before rendering a table.
    fn visit_table(&mut self, table: &ParagraphData) -> VisitorAction {
        let _ = table;
        VisitorAction::Continue
    }

    /// Called before rendering a code block.
    fn visit_code(&mut self, code: &ParagraphData) -> VisitorAction {
        let _ = code;
        VisitorAction::Continue
    }

    /// Called once before the first paragraph.
    fn on_document_start(&mut self) {}

    /// Called once after the last paragraph.
    fn on_document_end(&mut self) {}
}

/// Default visitor that performs no customization.
///
/// All visit methods return `VisitorAction::Continue`.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentVisitor for DefaultVisitor {}

/// Visitor that skips all figures.
#[derive(Debug, Clone, Default)]
pub struct SkipImagesVisitor;

impl DocumentVisitor for SkipImagesVisitor {
    fn visit_image(&mut self, _src: &str, _alt: Option<&str>) -> VisitorAction {
        VisitorAction::Skip
    }
}

/// Visitor that skips bibliography paragraphs.
#[derive(Debug, Clone, Default)]
pub struct SkipReferencesVisitor;

impl DocumentVisitor for SkipReferencesVisitor {
    fn visit_paragraph(&mut self, para: &ParagraphData) -> VisitorAction {
        if para.is_reference {
            VisitorAction::Skip
        } else {
            VisitorAction::Continue
        }
    }
}

/// Visitor that limits heading depth.
#[derive(Debug, Clone)]
pub struct MaxHeadingDepthVisitor {
    max_level: u8,
}

impl MaxHeadingDepthVisitor {
    /// Create a visitor that limits headings to the specified max level.
    pub fn new(max_level: u8) -> Self {
        Self {
            max_level: max_level.clamp(1, 6),
        }
    }
}

impl DocumentVisitor for MaxHeadingDepthVisitor {
    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        let effective_level = level.min(self.max_level);
        let prefix = "#".repeat(effective_level as usize);
        VisitorAction::Replace(format!("{} {}\n\n", prefix, text))
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn DocumentVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: DocumentVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    fn first_action<F>(&mut self, mut visit: F) -> VisitorAction
    where
        F: FnMut(&mut dyn DocumentVisitor) -> VisitorAction,
    {
        for visitor in &mut self.visitors {
            let action = visit(visitor.as_mut());
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentVisitor for CompositeVisitor {
    fn visit_paragraph(&mut self, para: &ParagraphData) -> VisitorAction {
        self.first_action(|v| v.visit_paragraph(para))
    }

    fn visit_heading(&mut self, text: &str, level: u8) -> VisitorAction {
        self.first_action(|v| v.visit_heading(text, level))
    }

    fn visit_image(&mut self, src: &str, alt: Option<&str>) -> VisitorAction {
        self.first_action(|v| v.visit_image(src, alt))
    }

    fn visit_table(&mut self, table: &ParagraphData) -> VisitorAction {
        self.first_action(|v| v.visit_table(table))
    }

    fn visit_code(&mut self, code: &ParagraphData) -> VisitorAction {
        self.first_action(|v| v.visit_code(code))
    }

    fn on_document_start(&mut self) {
        for visitor in &mut self.visitors {
            visitor.on_document_start();
        }
    }

    fn on_document_end(&mut self) {
        for visitor in &mut self.visitors {
            visitor.on_document_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_action_default() {
        let action = VisitorAction::default();
        assert!(matches!(action, VisitorAction::Continue));
    }

    #[test]
    fn test_visitor_action_should_skip() {
        assert!(!VisitorAction::Continue.should_skip());
        assert!(!VisitorAction::Replace("test".into()).should_skip());
        assert!(VisitorAction::Skip.should_skip());
    }

    #[test]
    fn test_visitor_action_replacement() {
        assert!(VisitorAction::Continue.replacement().is_none());
        assert!(VisitorAction::Skip.replacement().is_none());
        assert_eq!(
            VisitorAction::Replace("hello".into()).replacement(),
            Some("hello")
        );
    }

    #[test]
    fn test_skip_references_visitor() {
        let mut visitor = SkipReferencesVisitor;
        let mut para = ParagraphData::with_text("p-1", 0, "[1] Entry");
        assert!(!visitor.visit_paragraph(&para).should_skip());
        para.is_reference = true;
        assert!(visitor.visit_paragraph(&para).should_skip());
    }

    #[test]
    fn test_max_heading_depth_visitor() {
        let mut visitor = MaxHeadingDepthVisitor::new(2);
        let action = visitor.visit_heading("Deep Heading", 4);
        assert!(action.is_replace());
        assert!(action.replacement().unwrap().starts_with("## "));
    }

    #[test]
    fn test_composite_visitor() {
        let mut composite = CompositeVisitor::new()
            .with_visitor(SkipImagesVisitor)
            .with_visitor(DefaultVisitor);

        assert!(composite.visit_image("a.png", None).should_skip());

        let para = ParagraphData::with_text("p-1", 0, "x");
        assert!(matches!(
            composite.visit_paragraph(&para),
            VisitorAction::Continue
        ));
    }
}
