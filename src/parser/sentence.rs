//! Sentence segmentation and bilingual alignment.
//!
//! Alignment is deliberately conservative: sentences are paired by index
//! only when both languages segment into the same number (greater than one)
//! of sentences. Any mismatch collapses the block into one pair covering the
//! whole text, trading granularity for guaranteed-correct pairing.

use crate::model::{Language, Sentence};

use super::text;

/// Abbreviations that do not end a primary-language sentence.
const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "cf", "ch", "def", "dr", "e.g", "eq", "eqs", "fig", "figs", "i.e", "lem",
    "mr", "mrs", "ms", "no", "pp", "prof", "ref", "refs", "resp", "sec", "secs", "st", "tab",
    "thm", "viz", "vol", "vs",
];

/// Characters that may trail terminal punctuation inside the same sentence.
const CLOSERS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '}'];

/// Characters that may open a new primary-language sentence besides letters and digits.
const OPENERS: &[char] = &['"', '\'', '\u{201C}', '\u{2018}', '(', '[', '$'];

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\u{3002}' | '\u{FF01}' | '\u{FF1F}')
}

fn is_fullwidth_terminal(c: char) -> bool {
    matches!(c, '\u{3002}' | '\u{FF01}' | '\u{FF1F}')
}

/// Largest visible length of a fragment merged onto its predecessor.
fn merge_threshold(language: Language) -> usize {
    match language {
        Language::Primary => 3,
        Language::Secondary => 2,
    }
}

/// Split plain text into sentence-like chunks.
pub fn split_sentences(input: &str, language: Language) -> Vec<String> {
    let normalized = text::normalize(input);
    if normalized.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = normalized.chars().collect();
    let mut raw: Vec<String> = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !is_terminal(chars[i]) {
            i += 1;
            continue;
        }

        let mut end = i + 1;
        while end < chars.len() && (is_terminal(chars[end]) || CLOSERS.contains(&chars[end])) {
            end += 1;
        }

        let mut next = end;
        while next < chars.len() && chars[next].is_whitespace() {
            next += 1;
        }
        if next >= chars.len() {
            break;
        }

        let spaced = next > end;
        let boundary = match language {
            Language::Primary => {
                spaced && starts_sentence(chars[next]) && !is_abbreviation(&chars[start..i])
            }
            Language::Secondary => spaced || is_fullwidth_terminal(chars[end - 1]),
        };

        if boundary {
            raw.push(chars[start..end].iter().collect::<String>().trim().to_string());
            start = next;
        }
        i = next.max(i + 1);
    }

    let tail: String = chars[start..].iter().collect::<String>().trim().to_string();
    if !tail.is_empty() {
        raw.push(tail);
    }

    merge_short_fragments(raw, merge_threshold(language))
}

fn starts_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || OPENERS.contains(&c) || !c.is_alphabetic()
}

/// Check the token right before a period against known abbreviations.
fn is_abbreviation(before: &[char]) -> bool {
    let token: String = before
        .iter()
        .rev()
        .take_while(|c| c.is_alphabetic() || **c == '.')
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if token.is_empty() {
        return false;
    }

    let mut letters = token.chars().filter(|c| c.is_alphabetic());
    if let (Some(first), None) = (letters.next(), letters.next()) {
        // Single initials such as "J." in author lists
        if first.is_uppercase() {
            return true;
        }
    }

    let lower = token.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

fn merge_short_fragments(fragments: Vec<String>, threshold: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match out.last_mut() {
            Some(prev) if text::visible_char_count(&fragment) <= threshold => {
                prev.push(' ');
                prev.push_str(&fragment);
            }
            _ => out.push(fragment),
        }
    }
    out
}

/// Align primary and secondary text into sentence pairs.
///
/// Returns one pair per sentence when both sides have the same count
/// greater than one; otherwise a single pair with the whole text of each
/// side. Returns an empty list only when both sides are empty.
pub fn align(en: &str, ko: &str) -> Vec<Sentence> {
    let en_sentences = split_sentences(en, Language::Primary);
    let ko_sentences = split_sentences(ko, Language::Secondary);

    if en_sentences.len() == ko_sentences.len() && en_sentences.len() > 1 {
        return en_sentences
            .into_iter()
            .zip(ko_sentences)
            .map(|(en, ko)| Sentence { en, ko })
            .collect();
    }

    let en_full = text::normalize(en);
    let ko_full = text::normalize(ko);
    if en_full.is_empty() && ko_full.is_empty() {
        return Vec::new();
    }
    vec![Sentence::new(en_full, ko_full)]
}
