//! Citation marker extraction and bibliography resolution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Citation, Language, ParagraphData};

/// Blocks past the references heading within which sub-headings stay in the section.
const REFERENCE_HEADING_GRACE: usize = 3;

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*\d+(?:\s*[-–,]\s*\d+)*\s*\]").expect("hardcoded regex is valid")
});

static AUTHOR_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"[A-Z][\p{L}'’\-]+";
    let item = format!(
        r"{name}(?:\s+(?:et\s+al\.?|(?:and|&)\s+{name}))?,?\s+\d{{4}}[a-z]?",
        name = name
    );
    Regex::new(&format!(r"\({item}(?:\s*;\s*{item})*\)", item = item))
        .expect("hardcoded regex is valid")
});

static SINGLE_NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*(\d+)\s*\]$").expect("hardcoded regex is valid"));

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?(\d+)\]?[.):\s]").expect("hardcoded regex is valid"));

static REFERENCE_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:references|bibliography|works\s+cited|literature\s+cited)\b|참고\s?문헌")
        .expect("hardcoded regex is valid")
});

/// Extract citation markers from visible text, deduplicated in first-seen order.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let mut found: Vec<(usize, &str)> = NUMERIC_RE
        .find_iter(text)
        .chain(AUTHOR_YEAR_RE.find_iter(text))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    found.sort_by_key(|(start, _)| *start);

    let mut citations: Vec<Citation> = Vec::new();
    for (_, marker) in found {
        if !citations.iter().any(|c| c.id == marker) {
            citations.push(Citation::new(marker));
        }
    }
    citations
}

/// Check if text names a references or bibliography section.
pub fn is_reference_text(text: &str) -> bool {
    REFERENCE_TERM_RE.is_match(text)
}

fn visible_text(paragraph: &ParagraphData) -> String {
    let primary = paragraph.plain_text(Language::Primary);
    if primary.is_empty() {
        paragraph.plain_text(Language::Secondary)
    } else {
        primary
    }
}

/// Link bare numeric citations to the bibliography entries they name.
///
/// Blocks walked inside the references section are flagged as reference
/// content. Returns the number of citations resolved.
pub fn resolve_citations(paragraphs: &mut [ParagraphData]) -> usize {
    let Some(start) = paragraphs
        .iter()
        .position(|p| p.is_heading() && is_reference_text(&visible_text(p)))
    else {
        log::debug!("citations: no references section");
        return 0;
    };

    let mut entries: HashMap<u64, String> = HashMap::new();
    for pos in start + 1..paragraphs.len() {
        let paragraph = &mut paragraphs[pos];
        if paragraph.is_heading()
            && pos - start > REFERENCE_HEADING_GRACE
            && !paragraph.is_reference
        {
            break;
        }
        paragraph.is_reference = true;

        let text = visible_text(paragraph);
        let numeral = ENTRY_RE
            .captures(text.trim_start())
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        if let Some(n) = numeral {
            entries.entry(n).or_insert_with(|| paragraph.id.clone());
        }
    }

    if entries.is_empty() {
        log::debug!("citations: references section has no numbered entries");
        return 0;
    }

    let mut resolved = 0;
    for paragraph in paragraphs.iter_mut() {
        for citation in &mut paragraph.citations {
            let target = SINGLE_NUMERAL_RE
                .captures(&citation.id)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .and_then(|n| entries.get(&n));
            if let Some(target) = target {
                citation.paragraph_id = Some(target.clone());
                resolved += 1;
            }
        }
    }

    log::debug!(
        "citations: {} entries, {} markers resolved",
        entries.len(),
        resolved
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParagraphMetadata, ParagraphType};

    fn text(id: &str, index: usize, body: &str) -> ParagraphData {
        let mut p = ParagraphData::with_text(id, index, body);
        p.citations = extract_citations(body);
        p
    }

    fn heading(id: &str, index: usize, body: &str) -> ParagraphData {
        let mut p = text(id, index, body);
        p.paragraph_type = ParagraphType::Heading;
        p.element = "h2".to_string();
        p.metadata = ParagraphMetadata::heading(2, format!("sec-{}", index));
        p.is_reference = is_reference_text(body);
        p
    }

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_numeric() {
        let ids: Vec<String> = extract_citations("See [12], [3, 4] and [5–7]; again [12].")
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["[12]", "[3, 4]", "[5–7]"]);
    }

    #[test]
    fn test_extract_author_year() {
        let citations = extract_citations("as shown (Smith et al., 2020; Jones, 2019) and [2].");
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].id, "(Smith et al., 2020; Jones, 2019)");
        assert_eq!(citations[1].id, "[2]");
        assert!(!citations[0].is_resolved());
    }

    #[test]
    fn test_extract_ignores_plain_parentheses() {
        assert!(extract_citations("a value (see below) of [x]").is_empty());
    }

    #[test]
    fn test_reference_terms() {
        assert!(is_reference_text("References"));
        assert!(is_reference_text("7 BIBLIOGRAPHY"));
        assert!(is_reference_text("참고문헌"));
        assert!(!is_reference_text("Referenced works"));
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_resolve_single_numeral() {
        let mut paragraphs = vec![
            text("p-body", 0, "Prior work [1] and [1, 2]."),
            heading("p-refs", 1, "References"),
            text("p-r1", 2, "[1] A. Author. A title."),
            text("p-r2", 3, "2. B. Author. Another title."),
        ];

        let resolved = resolve_citations(&mut paragraphs);
        assert_eq!(resolved, 2);
        assert_eq!(paragraphs[0].citations[0].paragraph_id.as_deref(), Some("p-r1"));
        assert!(paragraphs[0].citations[1].paragraph_id.is_none());
        assert!(paragraphs[2].is_reference);
        assert!(paragraphs[3].is_reference);
        assert!(!paragraphs[0].is_reference);
    }

    #[test]
    fn test_first_entry_wins() {
        let mut paragraphs = vec![
            text("p-body", 0, "See [3]."),
            heading("p-refs", 1, "Bibliography"),
            text("p-a", 2, "3) first"),
            text("p-b", 3, "3) second"),
        ];
        resolve_citations(&mut paragraphs);
        assert_eq!(paragraphs[0].citations[0].paragraph_id.as_deref(), Some("p-a"));
    }

    #[test]
    fn test_walk_stops_at_later_heading() {
        let mut paragraphs = vec![
            text("p-body", 0, "See [4]."),
            heading("p-refs", 1, "References"),
            text("p-1", 2, "[1] one"),
            text("p-2", 3, "[2] two"),
            text("p-3", 4, "[3] three"),
            heading("p-app", 5, "Appendix"),
            text("p-4", 6, "[4] not a reference"),
        ];
        resolve_citations(&mut paragraphs);
        assert!(paragraphs[0].citations[0].paragraph_id.is_none());
        assert!(!paragraphs[5].is_reference);
        assert!(!paragraphs[6].is_reference);
    }

    #[test]
    fn test_no_references_section() {
        let mut paragraphs = vec![text("p-body", 0, "See [1]."), text("p-x", 1, "[1] entry")];
        assert_eq!(resolve_citations(&mut paragraphs), 0);
        assert!(paragraphs[0].citations[0].paragraph_id.is_none());
    }
}
