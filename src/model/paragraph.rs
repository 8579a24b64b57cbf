//! Paragraph and sentence-level types.

use serde::{Deserialize, Serialize};

/// Content classification of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphType {
    /// Running text
    #[default]
    Text,
    /// Section heading
    Heading,
    /// Figure or inline image
    Image,
    /// Tabular content
    Table,
    /// Preformatted code
    Code,
}

impl ParagraphType {
    /// Lowercase name used in signatures and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParagraphType::Text => "text",
            ParagraphType::Heading => "heading",
            ParagraphType::Image => "image",
            ParagraphType::Table => "table",
            ParagraphType::Code => "code",
        }
    }
}

impl std::fmt::Display for ParagraphType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language side of a bilingual paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// The original (English) text
    Primary,
    /// The overlay translation (Korean)
    Secondary,
}

/// An aligned pair of primary and secondary sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Primary-language plain text
    pub en: String,

    /// Secondary-language plain text (empty when untranslated)
    pub ko: String,
}

impl Sentence {
    /// Create a new sentence pair.
    pub fn new(en: impl Into<String>, ko: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ko: ko.into(),
        }
    }

    /// Get the text for one side of the pair.
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::Primary => &self.en,
            Language::Secondary => &self.ko,
        }
    }
}

/// A citation marker found in a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Literal marker text, e.g. `[12]` or `(Smith, 2020)`
    pub id: String,

    /// Bibliography paragraph this marker resolves to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_id: Option<String>,
}

impl Citation {
    /// Create an unresolved citation.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            paragraph_id: None,
        }
    }

    /// Check if the marker points at a bibliography entry.
    pub fn is_resolved(&self) -> bool {
        self.paragraph_id.is_some()
    }
}

/// Type-specific paragraph metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphMetadata {
    /// Heading level (1-6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    /// Heading anchor id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,

    /// Resolved image source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Image alternative text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Figure or table caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl ParagraphMetadata {
    /// Metadata for a heading.
    pub fn heading(level: u8, anchor_id: impl Into<String>) -> Self {
        Self {
            level: Some(level.clamp(1, 6)),
            anchor_id: Some(anchor_id.into()),
            ..Default::default()
        }
    }

    /// Metadata for an image.
    pub fn image(src: impl Into<String>, alt: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            alt: Some(alt.into()),
            caption: Some(caption.into()),
            ..Default::default()
        }
    }

    /// Metadata for a table.
    pub fn table(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Default::default()
        }
    }
}

/// The atomic unit of the document model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphData {
    /// Stable content-derived identifier
    pub id: String,

    /// Content classification
    #[serde(rename = "type")]
    pub paragraph_type: ParagraphType,

    /// Normalized presentation tag
    pub element: String,

    /// Sanitized primary-language markup
    pub en_text: String,

    /// Sanitized secondary-language markup
    pub ko_text: String,

    /// Aligned sentence pairs
    pub sentences: Vec<Sentence>,

    /// Citation markers in document order
    pub citations: Vec<Citation>,

    /// Position in document order
    pub index: usize,

    /// Type-specific metadata
    #[serde(default)]
    pub metadata: ParagraphMetadata,

    /// Whether this block belongs to the bibliography
    #[serde(default)]
    pub is_reference: bool,
}

impl ParagraphData {
    /// Create a plain text paragraph with a single sentence pair.
    pub fn with_text(id: impl Into<String>, index: usize, en: impl Into<String>) -> Self {
        let en = en.into();
        Self {
            id: id.into(),
            paragraph_type: ParagraphType::Text,
            element: "p".to_string(),
            sentences: vec![Sentence::new(en.clone(), "")],
            en_text: en,
            ko_text: String::new(),
            citations: Vec::new(),
            index,
            metadata: ParagraphMetadata::default(),
            is_reference: false,
        }
    }

    /// Get the plain text for one language, joined from the sentence pairs.
    pub fn plain_text(&self, language: Language) -> String {
        self.sentences
            .iter()
            .map(|s| s.text(language))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.paragraph_type == ParagraphType::Heading
    }

    /// Get the heading level (1-6) or None.
    pub fn heading_level(&self) -> Option<u8> {
        self.metadata.level
    }

    /// Check if the overlay supplied a translation for this block.
    pub fn has_translation(&self) -> bool {
        !self.ko_text.trim().is_empty()
    }
}
