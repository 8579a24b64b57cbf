//! Markup sanitization for one language chunk.

use super::dom::{Dom, NodeId};
use super::matcher::OverlayMatcher;
use super::noise::{is_inline_hidden, is_math_source};
use super::text;

/// Elements dropped with their content.
const DROP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "embed", "form", "input",
    "textarea", "select", "option", "button", "dialog", "canvas",
];

/// Heavy math renderings, redundant with the math source.
const MATH_RENDER_TAGS: &[&str] = &["mjx-container", "mjx-assistive-mml", "math"];

/// Attributes kept on surviving elements.
const KEEP_ATTRS: &[&str] = &["href", "src", "alt", "title", "id", "class"];

/// Elements kept as-is; everything else is replaced by its children.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "hr", "div", "span", "b", "strong", "i", "em", "u", "s", "sub", "sup", "small",
    "mark", "code", "pre", "kbd", "samp", "var", "a", "q", "cite", "abbr", "img", "figure",
    "figcaption", "picture", "source", "table", "thead", "tbody", "tfoot", "tr", "th", "td",
    "caption", "colgroup", "col", "ul", "ol", "li", "dl", "dt", "dd", "blockquote", "h1", "h2",
    "h3", "h4", "h5", "h6",
];

/// Options for one sanitization pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeOptions {
    /// Keep `<svg>` content (used for table markup)
    pub keep_vector_graphics: bool,
}

/// Result of sanitizing one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedChunk {
    /// Sanitized markup of the chunk's children
    pub html: String,
    /// Whitespace-normalized visible text
    pub text: String,
    /// Visible text with original line breaks
    pub raw_text: String,
}

impl SanitizedChunk {
    /// Check if the chunk has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Sanitize the children of `content` in place and serialize them.
pub fn sanitize(
    dom: &mut Dom,
    content: NodeId,
    matcher: &OverlayMatcher,
    options: SanitizeOptions,
) -> SanitizedChunk {
    for node in dom.descendants(content) {
        if !dom.is_attached(node) {
            continue;
        }

        if dom.text(node).is_some() {
            let in_pre = dom
                .ancestors(node)
                .any(|a| dom.is_tag(a, &["pre", "code"]));
            if !in_pre {
                let collapsed = dom.text(node).map(text::collapse_whitespace);
                if let Some(collapsed) = collapsed {
                    dom.set_text(node, collapsed);
                }
            }
            continue;
        }
        if dom.element(node).is_none() {
            // Comments never reach the output
            dom.detach(node);
            continue;
        }

        let in_kept_svg = options.keep_vector_graphics
            && dom.ancestors(node).any(|a| dom.is_tag(a, &["svg"]));
        if in_kept_svg {
            continue;
        }

        if is_math_source(dom, node, matcher) {
            let source = dom.text_content(node).trim().to_string();
            if source.is_empty() {
                dom.detach(node);
            } else {
                dom.replace_with_text(node, format!("${}$", source));
            }
            continue;
        }

        let class = dom.class(node).to_string();
        if dom.is_tag(node, DROP_TAGS)
            || matcher.is_input_artifact(&class)
            || is_inline_hidden(dom, node)
            || is_math_render(dom, node, &class, options)
        {
            dom.detach(node);
            continue;
        }

        if options.keep_vector_graphics && dom.is_tag(node, &["svg"]) {
            continue;
        }

        dom.retain_attrs(node, |name| {
            KEEP_ATTRS.iter().any(|k| k.eq_ignore_ascii_case(name))
        });
        if !dom.is_tag(node, ALLOWED_TAGS) {
            dom.unwrap(node);
        }
    }

    let raw_text = dom.visible_text(content);
    SanitizedChunk {
        html: dom.inner_html(content).trim().to_string(),
        text: text::normalize(&raw_text),
        raw_text,
    }
}

fn is_math_render(dom: &Dom, node: NodeId, class: &str, options: SanitizeOptions) -> bool {
    if dom.is_tag(node, MATH_RENDER_TAGS) {
        return true;
    }
    if !options.keep_vector_graphics && dom.is_tag(node, &["svg"]) {
        return true;
    }
    class.to_ascii_lowercase().contains("mathjax")
}
