//! Flattening of the content subtree into block-level units.
//!
//! Tag-based block detection alone fails on overlay-generated wrapper divs
//! and on export tools that put semantic content in generic containers, so
//! direct-text, media and hint heuristics decide when a container becomes a
//! block and when the collector descends into it.

use super::dom::{Dom, NodeId};
use super::matcher::OverlayMatcher;
use super::noise::is_aria_hidden;

/// Block-level tags used for "has block children" decisions.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Heading tags.
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Media emitted as a block and never decomposed.
const ATOMIC_TAGS: &[&str] = &["img", "figure", "picture", "table", "hr"];

/// Media that makes a paragraph-like or generic container worth keeping.
const MEDIA_TAGS: &[&str] = &["img", "picture", "svg", "video", "canvas", "table"];

/// Containers the collector always descends into.
const STRUCTURAL_CONTAINERS: &[&str] = &[
    "html", "body", "main", "article", "section", "header", "footer", "aside", "nav", "div",
    "center", "details", "form", "hgroup",
];

/// Class/id fragments that mark structurally meaningful containers.
const STRUCTURAL_HINTS: &[&str] = &["abstract", "author", "caption", "title"];

enum Visit {
    Emit,
    Descend,
    DescendBlocks,
    Skip,
}

/// Collect block nodes under `root` in document order.
pub fn collect_blocks(dom: &Dom, root: NodeId, matcher: &OverlayMatcher) -> Vec<NodeId> {
    let mut blocks = Vec::new();
    let mut stack: Vec<NodeId> = dom.element_children(root).collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        match visit(dom, node, matcher) {
            Visit::Emit => blocks.push(node),
            Visit::Descend => {
                let mut children: Vec<NodeId> = dom.element_children(node).collect();
                children.reverse();
                stack.extend(children);
            }
            Visit::DescendBlocks => {
                let mut children: Vec<NodeId> = dom
                    .element_children(node)
                    .filter(|&c| dom.is_tag(c, BLOCK_TAGS))
                    .collect();
                children.reverse();
                stack.extend(children);
            }
            Visit::Skip => {}
        }
    }

    log::debug!("collect: {} blocks", blocks.len());
    blocks
}

fn visit(dom: &Dom, node: NodeId, matcher: &OverlayMatcher) -> Visit {
    if should_skip(dom, node, matcher) {
        return Visit::Skip;
    }
    let Some(tag) = dom.tag(node) else {
        return Visit::Skip;
    };
    let tag = tag.to_ascii_lowercase();

    match tag.as_str() {
        "ul" | "ol" | "dl" | "menu" => return Visit::Descend,
        "li" | "dt" | "dd" => {
            return if has_block_children(dom, node) {
                Visit::DescendBlocks
            } else {
                Visit::Emit
            };
        }
        t if ATOMIC_TAGS.contains(&t) => return Visit::Emit,
        t if HEADING_TAGS.contains(&t) => return Visit::Emit,
        "p" | "blockquote" | "pre" => {
            if has_direct_text(dom, node)
                || has_useful_media(dom, node)
                || has_structural_hint(dom, node)
            {
                return Visit::Emit;
            }
        }
        "div" => {
            let near_leaf = !has_block_children(dom, node);
            if (near_leaf && (has_direct_text(dom, node) || has_useful_media(dom, node)))
                || has_structural_hint(dom, node)
            {
                return Visit::Emit;
            }
            return Visit::Descend;
        }
        _ => {}
    }

    if has_block_children(dom, node) || STRUCTURAL_CONTAINERS.contains(&tag.as_str()) {
        Visit::Descend
    } else if has_direct_text(dom, node) {
        Visit::Emit
    } else {
        Visit::Skip
    }
}

/// Nodes that never become blocks and are never descended into.
pub fn should_skip(dom: &Dom, node: NodeId, matcher: &OverlayMatcher) -> bool {
    if dom.is_tag(
        node,
        &["script", "style", "noscript", "template", "head", "input", "textarea", "select", "button"],
    ) {
        return true;
    }
    if dom.ancestors(node).any(|a| dom.is_tag(a, &["head"])) {
        return true;
    }
    let class = dom.class(node);
    is_aria_hidden(dom, node) || matcher.is_input_artifact(class) || matcher.is_noise(class)
}

/// Check for block-level element children.
pub fn has_block_children(dom: &Dom, node: NodeId) -> bool {
    dom.element_children(node).any(|c| dom.is_tag(c, BLOCK_TAGS))
}

/// Check for non-blank text outside block-level children.
pub fn has_direct_text(dom: &Dom, node: NodeId) -> bool {
    dom.children(node).iter().any(|&c| {
        if let Some(text) = dom.text(c) {
            return !text.trim().is_empty();
        }
        dom.element(c).is_some()
            && !dom.is_tag(c, BLOCK_TAGS)
            && !dom.text_content(c).trim().is_empty()
    })
}

/// Check for an image, vector graphic, video or table descendant.
pub fn has_useful_media(dom: &Dom, node: NodeId) -> bool {
    dom.descendants(node)
        .into_iter()
        .any(|d| dom.is_tag(d, MEDIA_TAGS))
}

/// Check for a class/id hint or a heading role.
pub fn has_structural_hint(dom: &Dom, node: NodeId) -> bool {
    if dom
        .attr(node, "role")
        .map(|r| r.eq_ignore_ascii_case("heading"))
        .unwrap_or(false)
    {
        return true;
    }
    let marker = format!(
        "{} {}",
        dom.class(node),
        dom.attr(node, "id").unwrap_or("")
    )
    .to_ascii_lowercase();
    STRUCTURAL_HINTS.iter().any(|h| marker.contains(h))
}
