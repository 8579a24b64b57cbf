//! Content root selection.
//!
//! Wrapper structure varies wildly between export tools, so the root is
//! chosen by visible-text volume among a prioritized candidate list rather
//! than by any single selector.

use super::dom::{Dom, NodeId};
use super::matcher::OverlayMatcher;
use super::text;

/// Pick the subtree most likely to hold the paper body.
///
/// Candidates in priority order: overlay content-container ids, the first
/// `article`, the first `main`, `body`, the document element. The highest
/// visible-text length wins; ties keep the earlier candidate.
pub fn select_root(dom: &Dom, matcher: &OverlayMatcher) -> NodeId {
    let candidates = candidates(dom, matcher);

    let mut best: Option<(NodeId, usize)> = None;
    for id in candidates {
        let score = text::normalize(&dom.visible_text(id)).chars().count();
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((id, score)),
        }
    }

    match best {
        Some((id, score)) => {
            log::debug!("root: selected <{}> with score {}", dom.tag(id).unwrap_or("#root"), score);
            id
        }
        None => dom.root(),
    }
}

fn candidates(dom: &Dom, matcher: &OverlayMatcher) -> Vec<NodeId> {
    let all = dom.descendants(dom.root());
    let mut out = Vec::new();

    for wanted in &matcher.content_container_ids {
        if let Some(id) = all
            .iter()
            .copied()
            .find(|&n| dom.attr(n, "id") == Some(wanted.as_str()))
        {
            out.push(id);
        }
    }

    for tag in ["article", "main", "body", "html"] {
        if let Some(id) = all.iter().copied().find(|&n| dom.is_tag(n, &[tag])) {
            out.push(id);
        }
    }

    out
}
