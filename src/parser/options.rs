//! Parsing options and configuration.

use super::block::DEFAULT_DEDUP_PREFIX_CHARS;
use super::matcher::OverlayMatcher;

/// Default bound on the text kept by the single-paragraph fallback.
pub const DEFAULT_FALLBACK_MAX_CHARS: usize = 100_000;

/// Options for parsing paper documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Overlay class/id conventions
    pub matcher: OverlayMatcher,

    /// Visible characters used in the dedup signature
    pub dedup_prefix_chars: usize,

    /// Character bound for the fallback paragraph
    pub fallback_max_chars: usize,

    /// Reject inputs larger than this many bytes
    pub max_input_bytes: Option<usize>,

    /// Whether to strip heavy math payloads before tree construction
    pub preprocess: bool,

    /// Whether to detect and convert lightweight markup
    pub detect_light_markup: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable strict mode (return errors instead of the fallback paragraph).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable lenient mode (degrade to the fallback paragraph).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the overlay matcher.
    pub fn with_matcher(mut self, matcher: OverlayMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the dedup signature prefix length.
    pub fn with_dedup_prefix_chars(mut self, chars: usize) -> Self {
        self.dedup_prefix_chars = chars;
        self
    }

    /// Set the fallback paragraph bound.
    pub fn with_fallback_max_chars(mut self, chars: usize) -> Self {
        self.fallback_max_chars = chars;
        self
    }

    /// Set the maximum input size in bytes.
    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Enable or disable the string-level preprocessor.
    pub fn with_preprocess(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Enable or disable lightweight markup detection.
    pub fn with_light_markup_detection(mut self, detect: bool) -> Self {
        self.detect_light_markup = detect;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            matcher: OverlayMatcher::default(),
            dedup_prefix_chars: DEFAULT_DEDUP_PREFIX_CHARS,
            fallback_max_chars: DEFAULT_FALLBACK_MAX_CHARS,
            max_input_bytes: None,
            preprocess: true,
            detect_light_markup: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Return any error to the caller
    Strict,
    /// Degrade failures to a single fallback paragraph
    #[default]
    Lenient,
}
