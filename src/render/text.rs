//! Plain text rendering for parsed papers.

use crate::error::Result;
use crate::model::{Language, ParagraphType, ParsedPaper};

use super::{LanguageSelection, RenderOptions};

/// Convert a paper to plain text.
///
/// Each paragraph becomes one block separated by a blank line. With
/// [`LanguageSelection::Both`] the translation follows the original on its
/// own line. Untranslated paragraphs fall back to the original text when only
/// the secondary language is requested.
pub fn to_text(paper: &ParsedPaper, options: &RenderOptions) -> Result<String> {
    let mut blocks = Vec::with_capacity(paper.paragraphs.len());

    for para in &paper.paragraphs {
        if options.skip_references && para.is_reference {
            continue;
        }
        if para.paragraph_type == ParagraphType::Image {
            if let Some(caption) = para.metadata.caption.as_deref().filter(|c| !c.is_empty()) {
                blocks.push(caption.to_string());
            }
            continue;
        }

        let primary = para.plain_text(Language::Primary);
        let secondary = para.plain_text(Language::Secondary);
        let block = match options.language {
            LanguageSelection::Primary => primary,
            LanguageSelection::Secondary if secondary.is_empty() => primary,
            LanguageSelection::Secondary => secondary,
            LanguageSelection::Both
                if secondary.is_empty() || para.paragraph_type == ParagraphType::Code =>
            {
                primary
            }
            LanguageSelection::Both => format!("{}\n{}", primary, secondary),
        };

        if !block.trim().is_empty() {
            blocks.push(block);
        }
    }

    Ok(blocks.join("\n\n").trim().to_string())
}
