//! String-level noise removal applied before tree construction.
//!
//! Bilingual overlays on math-heavy papers duplicate every formula in
//! several heavy renderings. Cutting those out of the raw text bounds the
//! size of the tree built afterwards. Only the plain-text math source
//! (`<script type="math/tex">`) is left for later extraction.

/// Placeholder that replaces the whole `<head>` region.
pub const HEAD_PLACEHOLDER: &str = "<head><meta charset=\"utf-8\"></head>";

/// Summary of what the preprocessor removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessStats {
    /// Input size in bytes
    pub bytes_before: usize,
    /// Output size in bytes
    pub bytes_after: usize,
    /// Number of blocks and directives removed
    pub blocks_removed: usize,
}

/// Run every rewrite in order and return the reduced markup.
pub fn preprocess(html: &str) -> (String, PreprocessStats) {
    let mut stats = PreprocessStats {
        bytes_before: html.len(),
        ..Default::default()
    };

    let (out, n) = replace_head(html);
    stats.blocks_removed += n;
    let (out, n) = remove_blocks(&out, "math", |_| true);
    stats.blocks_removed += n;
    let (out, n) = remove_blocks(&out, "mjx-assistive-mml", |_| true);
    stats.blocks_removed += n;
    let (out, n) = remove_blocks(&out, "mjx-container", |_| true);
    stats.blocks_removed += n;
    let (out, n) = remove_blocks(&out, "span", |open| {
        open.to_ascii_lowercase().contains("mathjax_svg")
    });
    stats.blocks_removed += n;
    let (out, n) = remove_void_tags(&out, "base");
    stats.blocks_removed += n;

    stats.bytes_after = out.len();
    log::debug!(
        "preprocess: {} -> {} bytes, {} blocks removed",
        stats.bytes_before,
        stats.bytes_after,
        stats.blocks_removed
    );
    (out, stats)
}

/// Replace the `<head>...</head>` region with [`HEAD_PLACEHOLDER`].
pub fn replace_head(html: &str) -> (String, usize) {
    let lower = html.to_ascii_lowercase();
    let Some(start) = find_open(&lower, "head", 0) else {
        return (html.to_string(), 0);
    };
    let Some(close) = lower[start..].find("</head") else {
        return (html.to_string(), 0);
    };
    let close = start + close;
    let end = lower[close..]
        .find('>')
        .map(|i| close + i + 1)
        .unwrap_or(html.len());

    let mut out = String::with_capacity(html.len() - (end - start) + HEAD_PLACEHOLDER.len());
    out.push_str(&html[..start]);
    out.push_str(HEAD_PLACEHOLDER);
    out.push_str(&html[end..]);
    (out, 1)
}

/// Remove whole `<tag ...>...</tag>` blocks whose opening tag satisfies `matches_open`.
///
/// Nested blocks of the same tag are balanced. A block with no closing tag
/// is removed up to the end of input.
pub fn remove_blocks<F>(html: &str, tag: &str, matches_open: F) -> (String, usize)
where
    F: Fn(&str) -> bool,
{
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut search = 0;
    let mut removed = 0;

    while let Some(start) = find_open(&lower, tag, search) {
        let Some(open_end) = lower[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        if !matches_open(&html[start..open_end]) {
            search = open_end;
            continue;
        }

        let end = if html[..open_end].ends_with("/>") {
            open_end
        } else {
            find_block_end(&lower, tag, open_end)
        };

        out.push_str(&html[cursor..start]);
        cursor = end;
        search = end;
        removed += 1;
    }

    if removed == 0 {
        return (html.to_string(), 0);
    }
    out.push_str(&html[cursor..]);
    (out, removed)
}

/// Remove every occurrence of a void tag such as `<base href="...">`.
pub fn remove_void_tags(html: &str, tag: &str) -> (String, usize) {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut removed = 0;

    let mut search = 0;
    while let Some(start) = find_open(&lower, tag, search) {
        let end = lower[start..]
            .find('>')
            .map(|i| start + i + 1)
            .unwrap_or(html.len());
        out.push_str(&html[cursor..start]);
        cursor = end;
        search = end;
        removed += 1;
    }
    out.push_str(&html[cursor..]);
    (out, removed)
}

/// Find `<tag` followed by a tag-name boundary, starting at byte `from`.
fn find_open(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let pattern = format!("<{}", tag);
    let mut search = from;
    while search < lower.len() {
        let start = search + lower[search..].find(&pattern)?;
        let after = start + pattern.len();
        match lower.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            None => return None,
            _ => search = after,
        }
    }
    None
}

/// Byte offset just past the `</tag>` balancing an opening tag ending at `from`.
fn find_block_end(lower: &str, tag: &str, from: usize) -> usize {
    let close_pattern = format!("</{}", tag);
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let Some(close) = lower[pos..].find(&close_pattern).map(|i| pos + i) else {
            return lower.len();
        };
        match find_open(lower, tag, pos) {
            Some(open) if open < close => {
                depth += 1;
                pos = open + tag.len() + 1;
            }
            _ => {
                depth -= 1;
                pos = lower[close..]
                    .find('>')
                    .map(|i| close + i + 1)
                    .unwrap_or(lower.len());
                if depth == 0 {
                    return pos;
                }
            }
        }
    }
}
