//! Document-wide removal of non-content nodes.

use super::dom::{Dom, NodeId};
use super::matcher::OverlayMatcher;

/// Tags that never carry paper content.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "iframe", "object", "template", "noscript",
];

/// Check if a node is a plain-text math source carrier.
pub fn is_math_source(dom: &Dom, id: NodeId, matcher: &OverlayMatcher) -> bool {
    dom.is_tag(id, &["script"])
        && dom
            .attr(id, "type")
            .map(|t| matcher.is_math_source_type(t))
            .unwrap_or(false)
}

/// Check if a node is hidden through an inline `display: none` style.
pub fn is_inline_hidden(dom: &Dom, id: NodeId) -> bool {
    dom.attr(id, "style")
        .map(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            compact.contains("display:none")
        })
        .unwrap_or(false)
}

/// Check if a node is marked `aria-hidden="true"`.
pub fn is_aria_hidden(dom: &Dom, id: NodeId) -> bool {
    dom.attr(id, "aria-hidden")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Remove script/style/hidden/tracking nodes from the whole tree.
///
/// Returns the number of subtrees removed. Math source scripts survive
/// even when hidden.
pub fn remove_global_noise(dom: &mut Dom, matcher: &OverlayMatcher) -> usize {
    let doomed: Vec<NodeId> = dom
        .descendants(dom.root())
        .into_iter()
        .filter(|&id| dom.element(id).is_some())
        .filter(|&id| {
            if is_math_source(dom, id, matcher) {
                return false;
            }
            dom.is_tag(id, NOISE_TAGS)
                || is_aria_hidden(dom, id)
                || matcher.is_noise(dom.class(id))
                || is_inline_hidden(dom, id)
        })
        .collect();

    let mut removed = 0;
    for id in doomed {
        if dom.parent(id).is_some() {
            dom.detach(id);
            removed += 1;
        }
    }
    log::debug!("noise: removed {} subtrees", removed);
    removed
}
