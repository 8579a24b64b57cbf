//! Bilingual Markdown rendering for parsed papers.

use crate::error::Result;
use crate::model::{Language, ParagraphData, ParagraphType, ParsedPaper};

use super::visitor::{DefaultVisitor, DocumentVisitor, VisitorAction};
use super::{ExtractionStats, LanguageSelection, RenderOptions, RenderResult};

/// Convert a paper to Markdown.
pub fn to_markdown(paper: &ParsedPaper, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(paper)
}

/// Convert a paper to Markdown with statistics.
pub fn to_markdown_with_stats(paper: &ParsedPaper, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(paper)
}

/// Convert a paper to Markdown, letting a visitor skip or replace paragraphs.
pub fn to_markdown_with_visitor(
    paper: &ParsedPaper,
    options: &RenderOptions,
    visitor: &mut dyn DocumentVisitor,
) -> Result<String> {
    let mut renderer = MarkdownRenderer::new(options.clone());
    renderer.render_internal(paper, visitor)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
        }
    }

    /// Render a paper to Markdown.
    pub fn render(mut self, paper: &ParsedPaper) -> Result<String> {
        self.render_internal(paper, &mut DefaultVisitor)
    }

    /// Render a paper to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, paper: &ParsedPaper) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(paper, &mut DefaultVisitor)?;

        // Count words and characters in final content
        self.stats.count_text(&content);

        Ok(RenderResult::new(content, self.stats))
    }

    fn render_internal(
        &mut self,
        paper: &ParsedPaper,
        visitor: &mut dyn DocumentVisitor,
    ) -> Result<String> {
        let mut output = String::new();

        if self.options.include_toc && !paper.structure.toc.is_empty() {
            self.render_toc(&mut output, paper);
        }

        visitor.on_document_start();
        for para in &paper.paragraphs {
            if self.options.skip_references && para.is_reference {
                continue;
            }
            match visitor.visit_paragraph(para) {
                VisitorAction::Skip => continue,
                VisitorAction::Replace(content) => {
                    output.push_str(&content);
                    continue;
                }
                VisitorAction::Continue => {}
            }
            self.render_paragraph(&mut output, para, visitor);
        }
        visitor.on_document_end();

        Ok(output.trim().to_string())
    }

    fn render_toc(&self, output: &mut String, paper: &ParsedPaper) {
        output.push_str("## Contents\n\n");
        for entry in &paper.structure.toc {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            output.push_str(&format!(
                "{}- [{}](#{})\n",
                indent,
                self.escape(&entry.text),
                entry.id
            ));
        }
        output.push('\n');
    }

    fn render_paragraph(
        &mut self,
        output: &mut String,
        para: &ParagraphData,
        visitor: &mut dyn DocumentVisitor,
    ) {
        let action = match para.paragraph_type {
            ParagraphType::Heading => {
                let text = para.plain_text(Language::Primary);
                visitor.visit_heading(&text, para.heading_level().unwrap_or(1))
            }
            ParagraphType::Image => visitor.visit_image(
                para.metadata.src.as_deref().unwrap_or(""),
                para.metadata.alt.as_deref().filter(|a| !a.is_empty()),
            ),
            ParagraphType::Table => visitor.visit_table(para),
            ParagraphType::Code => visitor.visit_code(para),
            ParagraphType::Text => VisitorAction::Continue,
        };
        match action {
            VisitorAction::Skip => return,
            VisitorAction::Replace(content) => {
                output.push_str(&content);
                return;
            }
            VisitorAction::Continue => {}
        }

        if self.options.collect_stats {
            self.stats.paragraph_count += 1;
        }
        match para.paragraph_type {
            ParagraphType::Heading => self.render_heading(output, para),
            ParagraphType::Image => self.render_image(output, para),
            ParagraphType::Table => self.render_table(output, para),
            ParagraphType::Code => self.render_code(output, para),
            ParagraphType::Text => self.render_text(output, para),
        }
    }

    fn render_heading(&mut self, output: &mut String, para: &ParagraphData) {
        if self.options.collect_stats {
            self.stats.heading_count += 1;
        }
        let level = para
            .heading_level()
            .unwrap_or(1)
            .min(self.options.max_heading_level);
        let prefix = "#".repeat(level as usize);

        let (first, second) = self.language_pair(para);
        output.push_str(&format!("{} {}\n\n", prefix, self.escape(&first)));
        if let Some(second) = second {
            output.push_str(&format!("> {}\n\n", self.escape(&second)));
        }
    }

    fn render_text(&self, output: &mut String, para: &ParagraphData) {
        let (first, second) = self.language_pair(para);
        if !first.is_empty() {
            output.push_str(&self.escape(&first));
            output.push_str("\n\n");
        }
        if let Some(second) = second {
            output.push_str(&format!("> {}\n\n", self.escape(&second)));
        }
    }

    fn render_image(&mut self, output: &mut String, para: &ParagraphData) {
        if self.options.collect_stats {
            self.stats.image_count += 1;
        }
        let src = para.metadata.src.as_deref().unwrap_or("");
        let alt = para.metadata.alt.as_deref().unwrap_or("");
        output.push_str(&format!("![{}]({})\n\n", self.escape(alt), src));

        let caption = para.metadata.caption.as_deref().unwrap_or("");
        if !caption.is_empty() {
            output.push_str(&format!("*{}*\n\n", self.escape(caption)));
        }
    }

    fn render_table(&mut self, output: &mut String, para: &ParagraphData) {
        if self.options.collect_stats {
            self.stats.table_count += 1;
        }
        let caption = para.metadata.caption.as_deref().unwrap_or("");
        if !caption.is_empty() {
            output.push_str(&format!("**{}**\n\n", self.escape(caption)));
        }
        // Tables stay HTML; Markdown tables cannot express spans or embedded graphics
        output.push_str(para.en_text.trim());
        output.push_str("\n\n");
    }

    fn render_code(&mut self, output: &mut String, para: &ParagraphData) {
        if self.options.collect_stats {
            self.stats.code_count += 1;
        }
        let code = para
            .sentences
            .first()
            .map(|s| s.en.as_str())
            .unwrap_or("");
        let fence = if code.contains("```") { "~~~" } else { "```" };
        output.push_str(&format!("{}\n{}\n{}\n\n", fence, code, fence));
    }

    /// Text for the selected language(s): the main line and an optional quoted translation.
    fn language_pair(&self, para: &ParagraphData) -> (String, Option<String>) {
        let primary = para.plain_text(Language::Primary);
        let secondary = para.plain_text(Language::Secondary);

        match self.options.language {
            LanguageSelection::Primary => (primary, None),
            LanguageSelection::Secondary if secondary.is_empty() => (primary, None),
            LanguageSelection::Secondary => (secondary, None),
            LanguageSelection::Both if secondary.is_empty() => (primary, None),
            LanguageSelection::Both => (primary, Some(secondary)),
        }
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Core formatting that must be escaped
            '\\' | '`' | '*' | '_' |
            // Brackets for links/images, pipe for tables
            '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParagraphMetadata, Sentence};

    fn bilingual(id: &str, index: usize, en: &str, ko: &str) -> ParagraphData {
        let mut p = ParagraphData::with_text(id, index, en);
        p.ko_text = ko.to_string();
        p.sentences = vec![Sentence::new(en, ko)];
        p
    }

    fn heading(text: &str, level: u8) -> ParagraphData {
        let mut p = ParagraphData::with_text("p-h", 0, text);
        p.paragraph_type = ParagraphType::Heading;
        p.metadata = ParagraphMetadata::heading(level, "sec-1");
        p
    }

    fn paper(paragraphs: Vec<ParagraphData>) -> ParsedPaper {
        ParsedPaper {
            paragraphs,
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
    }

    #[test]
    fn test_render_bilingual_paragraph() {
        let doc = paper(vec![bilingual("p-1", 0, "Hello, world!", "안녕, 세상!")]);
        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result, "Hello, world!\n\n> 안녕, 세상!");
    }

    #[test]
    fn test_render_language_selection() {
        let doc = paper(vec![
            bilingual("p-1", 0, "Hello.", "안녕."),
            bilingual("p-2", 1, "Untranslated.", ""),
        ]);

        let primary = RenderOptions::new().with_language(LanguageSelection::Primary);
        assert_eq!(to_markdown(&doc, &primary).unwrap(), "Hello.\n\nUntranslated.");

        let secondary = RenderOptions::new().with_language(LanguageSelection::Secondary);
        assert_eq!(to_markdown(&doc, &secondary).unwrap(), "안녕.\n\nUntranslated.");
    }

    #[test]
    fn test_render_heading() {
        let doc = paper(vec![heading("Chapter 1", 2)]);
        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result, "## Chapter 1");
    }

    #[test]
    fn test_render_image_and_code() {
        let mut figure = ParagraphData::with_text("p-f", 0, "");
        figure.paragraph_type = ParagraphType::Image;
        figure.metadata = ParagraphMetadata::image("img/a.png", "Arch", "Overview");

        let mut code = ParagraphData::with_text("p-c", 1, "");
        code.paragraph_type = ParagraphType::Code;
        code.sentences = vec![Sentence::new("let x = 1;\nlet y = 2;", "")];

        let result = to_markdown(&paper(vec![figure, code]), &RenderOptions::new()).unwrap();
        assert_eq!(
            result,
            "![Arch](img/a.png)\n\n*Overview*\n\n```\nlet x = 1;\nlet y = 2;\n```"
        );
    }

    #[test]
    fn test_skip_references_option() {
        let mut reference = bilingual("p-r", 1, "Entry one.", "");
        reference.is_reference = true;
        let doc = paper(vec![bilingual("p-1", 0, "Body.", ""), reference]);

        let options = RenderOptions::new().with_skip_references(true);
        assert_eq!(to_markdown(&doc, &options).unwrap(), "Body.");
    }

    #[test]
    fn test_render_with_stats() {
        let doc = paper(vec![heading("Intro", 1), bilingual("p-1", 1, "Two words.", "")]);
        let result = to_markdown_with_stats(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.paragraph_count, 2);
        assert_eq!(result.stats.word_count, 4);
    }
}
