//! Rendering options and configuration.

use crate::model::Language;

/// Options for rendering a parsed paper.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Which language(s) to emit
    pub language: LanguageSelection,

    /// Prepend a table of contents built from the heading index
    pub include_toc: bool,

    /// Leave out bibliography paragraphs
    pub skip_references: bool,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Escape special Markdown characters in text
    pub escape_special_chars: bool,

    /// Collect extraction statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language selection.
    pub fn with_language(mut self, language: LanguageSelection) -> Self {
        self.language = language;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    /// Enable or disable bibliography paragraphs.
    pub fn with_skip_references(mut self, skip: bool) -> Self {
        self.skip_references = skip;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            language: LanguageSelection::Both,
            include_toc: false,
            skip_references: false,
            max_heading_level: 6,
            escape_special_chars: true,
            collect_stats: false,
        }
    }
}

/// Language selection for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageSelection {
    /// Original language only
    Primary,
    /// Translation only
    Secondary,
    /// Original followed by translation
    #[default]
    Both,
}

impl LanguageSelection {
    /// Check if a language should be emitted.
    pub fn includes(&self, language: Language) -> bool {
        match self {
            LanguageSelection::Primary => language == Language::Primary,
            LanguageSelection::Secondary => language == Language::Secondary,
            LanguageSelection::Both => true,
        }
    }

    /// Languages to emit, in order.
    pub fn languages(&self) -> &'static [Language] {
        match self {
            LanguageSelection::Primary => &[Language::Primary],
            LanguageSelection::Secondary => &[Language::Secondary],
            LanguageSelection::Both => &[Language::Primary, Language::Secondary],
        }
    }
}

impl std::str::FromStr for LanguageSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "primary" => Ok(LanguageSelection::Primary),
            "ko" | "secondary" => Ok(LanguageSelection::Secondary),
            "both" | "all" => Ok(LanguageSelection::Both),
            other => Err(format!("unknown language selection: {}", other)),
        }
    }
}
