//! Translation-overlay naming conventions.
//!
//! The overlay extension's class and id names are a versioned external
//! contract. Everything the pipeline knows about them lives here, so a new
//! overlay version only needs new patterns.

/// Class/id patterns identifying overlay markup and known noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMatcher {
    /// Outer wrapper holding one translated rendering
    pub wrapper_classes: Vec<String>,

    /// Inner element carrying the translated markup
    pub inner_classes: Vec<String>,

    /// Translation block markers removed after the split
    pub translation_block_classes: Vec<String>,

    /// Input widgets and status artifacts injected by the overlay
    pub input_artifact_classes: Vec<String>,

    /// Class substrings of overlay UI and math renderer widgets
    pub noise_class_patterns: Vec<String>,

    /// Class-token prefixes of UI frameworks leaking into exported pages
    pub noise_class_prefixes: Vec<String>,

    /// Overlay-specific content container ids, highest priority first
    pub content_container_ids: Vec<String>,

    /// `type` prefix of plain-text math source scripts
    pub math_source_type: String,
}

impl OverlayMatcher {
    /// Create a matcher with the default overlay conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wrapper class.
    pub fn with_wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_classes.push(class.into());
        self
    }

    /// Add an inner-content class.
    pub fn with_inner_class(mut self, class: impl Into<String>) -> Self {
        self.inner_classes.push(class.into());
        self
    }

    /// Add a noise class pattern.
    pub fn with_noise_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.noise_class_patterns.push(pattern.into());
        self
    }

    /// Add a noise class-token prefix.
    pub fn with_noise_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.noise_class_prefixes.push(prefix.into());
        self
    }

    /// Add a content container id with lowest priority.
    pub fn with_content_container_id(mut self, id: impl Into<String>) -> Self {
        self.content_container_ids.push(id.into());
        self
    }

    /// Check if a class attribute marks a translation wrapper.
    pub fn is_wrapper(&self, class: &str) -> bool {
        has_any_token(class, &self.wrapper_classes)
    }

    /// Check if a class attribute marks translated inner content.
    pub fn is_inner(&self, class: &str) -> bool {
        has_any_token(class, &self.inner_classes)
    }

    /// Check if a class attribute marks a stray translation block.
    pub fn is_translation_block(&self, class: &str) -> bool {
        has_any_token(class, &self.translation_block_classes)
    }

    /// Check if a class attribute marks an overlay input artifact.
    pub fn is_input_artifact(&self, class: &str) -> bool {
        class_contains_any(class, &self.input_artifact_classes)
    }

    /// Check if a class attribute matches a noise pattern.
    pub fn is_noise(&self, class: &str) -> bool {
        class_contains_any(class, &self.noise_class_patterns)
            || class_starts_with_any(class, &self.noise_class_prefixes)
    }

    /// Check if a `type` attribute marks a math source script.
    pub fn is_math_source_type(&self, script_type: &str) -> bool {
        script_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(&self.math_source_type)
    }
}

impl Default for OverlayMatcher {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            wrapper_classes: owned(&["immersive-translate-target-wrapper"]),
            inner_classes: owned(&["immersive-translate-target-inner"]),
            translation_block_classes: owned(&[
                "immersive-translate-target-translation-block-wrapper",
                "immersive-translate-target-translation-theme-none",
            ]),
            input_artifact_classes: owned(&[
                "immersive-translate-input",
                "immersive-translate-loading",
                "immersive-translate-error",
            ]),
            noise_class_patterns: owned(&[
                "immersive-translate-popup",
                "immersive-translate-float-ball",
                "immersive-translate-modal",
                "MathJax_Menu",
                "MathJax_Message",
                "MJX_LiveRegion",
                "MJX_HoverRegion",
            ]),
            noise_class_prefixes: owned(&["imt-", "ant-", "chakra-"]),
            content_container_ids: owned(&[
                "immersive-translate-content",
                "readability-page-1",
                "main-content",
            ]),
            math_source_type: "math/tex".to_string(),
        }
    }
}

/// Exact whitespace-separated token match.
fn has_any_token(class: &str, names: &[String]) -> bool {
    class
        .split_ascii_whitespace()
        .any(|token| names.iter().any(|n| n == token))
}

/// Substring match against each class token.
fn class_contains_any(class: &str, patterns: &[String]) -> bool {
    class
        .split_ascii_whitespace()
        .any(|token| patterns.iter().any(|p| token.contains(p.as_str())))
}

/// Prefix match against each class token.
fn class_starts_with_any(class: &str, prefixes: &[String]) -> bool {
    class
        .split_ascii_whitespace()
        .any(|token| prefixes.iter().any(|p| token.starts_with(p.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_token_match() {
        let m = OverlayMatcher::default();
        assert!(m.is_wrapper("notranslate immersive-translate-target-wrapper"));
        assert!(!m.is_wrapper("immersive-translate-target-wrapper-x"));
        assert!(m.is_inner("notranslate immersive-translate-target-inner"));
    }

    #[test]
    fn test_noise_substring_match() {
        let m = OverlayMatcher::default();
        assert!(m.is_noise("imt-fb-container"));
        assert!(m.is_noise("foo MathJax_Menu"));
        assert!(!m.is_noise("ltx_para"));
        assert!(m.is_input_artifact("immersive-translate-input-loading"));
    }

    #[test]
    fn test_framework_prefix_only_matches_token_start() {
        let m = OverlayMatcher::default();
        assert!(m.is_noise("ant-modal-wrap"));
        assert!(m.is_noise("x chakra-portal"));
        assert!(!m.is_noise("important-note"));
        assert!(!m.is_noise("relevant-work constant-table"));
        assert!(!m.is_noise("primt-box"));

        let m = m.with_noise_prefix("cookie-");
        assert!(m.is_noise("cookie-banner"));
        assert!(!m.is_noise("no-cookie-here"));
    }

    #[test]
    fn test_math_source_type() {
        let m = OverlayMatcher::default();
        assert!(m.is_math_source_type("math/tex"));
        assert!(m.is_math_source_type("Math/TeX; mode=display"));
        assert!(!m.is_math_source_type("text/javascript"));
    }

    #[test]
    fn test_builder_extends_defaults() {
        let m = OverlayMatcher::new()
            .with_wrapper_class("tx-wrap")
            .with_noise_pattern("cookie-");
        assert!(m.is_wrapper("tx-wrap"));
        assert!(m.is_wrapper("immersive-translate-target-wrapper"));
        assert!(m.is_noise("cookie-banner"));
    }
}
