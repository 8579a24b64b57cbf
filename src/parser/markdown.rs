//! Line-based conversion of lightweight markup to HTML.

use std::sync::LazyLock;

use regex::Regex;

use super::dom::escape_html;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("hardcoded regex is valid")
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*[-*+][ \t]+(.*)$").expect("hardcoded regex is valid"));

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\d+[.)][ \t]+(.*)$").expect("hardcoded regex is valid")
});

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"([^"]*)")?\s*\)$"#)
        .expect("hardcoded regex is valid")
});

static SEPARATOR_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("hardcoded regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Numbered => "ol",
        }
    }
}

#[derive(Default)]
struct Converter {
    out: Vec<String>,
    paragraph: Vec<String>,
    list: Option<(ListKind, Vec<String>)>,
    table: Vec<Vec<String>>,
    fence: Option<Vec<String>>,
}

impl Converter {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let joined = self.paragraph.join(" ");
            self.out.push(format!("<p>{}</p>", escape_html(&joined)));
            self.paragraph.clear();
        }
    }

    fn flush_list(&mut self) {
        if let Some((kind, items)) = self.list.take() {
            let body: String = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            self.out.push(format!("<{tag}>{}</{tag}>", body, tag = kind.tag()));
        }
    }

    fn flush_table(&mut self) {
        if self.table.is_empty() {
            return;
        }
        let mut html = String::from("<table>");
        for (i, row) in std::mem::take(&mut self.table).iter().enumerate() {
            let cell = if i == 0 { "th" } else { "td" };
            html.push_str("<tr>");
            for value in row {
                html.push_str(&format!("<{cell}>{}</{cell}>", escape_html(value), cell = cell));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        self.out.push(html);
    }

    fn flush_fence(&mut self) {
        if let Some(lines) = self.fence.take() {
            self.out
                .push(format!("<pre><code>{}</code></pre>", escape_html(&lines.join("\n"))));
        }
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_list();
        self.flush_table();
    }

    fn push_list_item(&mut self, kind: ListKind, item: &str) {
        self.flush_paragraph();
        self.flush_table();
        if matches!(&self.list, Some((current, _)) if *current != kind) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| (kind, Vec::new()))
            .1
            .push(item.trim().to_string());
    }

    fn push_table_row(&mut self, line: &str) {
        self.flush_paragraph();
        self.flush_list();
        let cells: Vec<String> = line
            .trim()
            .trim_start_matches('|')
            .trim_end_matches('|')
            .split('|')
            .map(|c| c.trim().to_string())
            .collect();
        if cells.iter().all(|c| SEPARATOR_CELL_RE.is_match(c)) {
            return;
        }
        self.table.push(cells);
    }

    fn line(&mut self, line: &str) {
        if let Some(code) = self.fence.as_mut() {
            if is_fence(line) {
                self.flush_fence();
            } else {
                code.push(line.to_string());
            }
            return;
        }

        let trimmed = line.trim();
        if is_fence(line) {
            self.flush_all();
            self.fence = Some(Vec::new());
        } else if trimmed.is_empty() {
            self.flush_all();
        } else if let Some(caps) = HEADING_RE.captures(trimmed) {
            self.flush_all();
            let level = caps[1].len();
            self.out
                .push(format!("<h{level}>{}</h{level}>", escape_html(&caps[2]), level = level));
        } else if let Some(caps) = BULLET_RE.captures(line) {
            self.push_list_item(ListKind::Bullet, &caps[1]);
        } else if let Some(caps) = NUMBERED_RE.captures(line) {
            self.push_list_item(ListKind::Numbered, &caps[1]);
        } else if trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|') {
            self.push_table_row(trimmed);
        } else if let Some(caps) = IMAGE_RE.captures(trimmed) {
            self.flush_all();
            let title = caps
                .get(3)
                .map(|t| format!(" title=\"{}\"", escape_html(t.as_str())))
                .unwrap_or_default();
            self.out.push(format!(
                "<figure><img src=\"{}\" alt=\"{}\"{}></figure>",
                escape_html(&caps[2]),
                escape_html(&caps[1]),
                title
            ));
        } else {
            self.flush_list();
            self.flush_table();
            self.paragraph.push(trimmed.to_string());
        }
    }

    fn finish(mut self) -> String {
        // An unterminated fence runs to the end of input
        self.flush_fence();
        self.flush_all();
        self.out.join("\n")
    }
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Convert lightweight markup to HTML, one line at a time.
///
/// Inline markers are kept as literal text; all text is escaped.
pub fn markdown_to_html(text: &str) -> String {
    let mut converter = Converter::default();
    for line in text.lines() {
        converter.line(line);
    }
    let html = converter.finish();
    log::debug!("markdown: converted {} bytes to {} bytes", text.len(), html.len());
    html
}
