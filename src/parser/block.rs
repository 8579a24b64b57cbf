//! Per-block parsing: bilingual split, sanitization, classification.

use crate::model::{ParagraphData, ParagraphMetadata, ParagraphType, Sentence};

use super::citation::{extract_citations, is_reference_text};
use super::collect::HEADING_TAGS;
use super::dom::{Dom, NodeData, NodeId};
use super::hash;
use super::matcher::OverlayMatcher;
use super::sanitize::{sanitize, SanitizeOptions, SanitizedChunk};
use super::sentence;
use super::text;

/// Blocks serialized with their own tag instead of only their children.
const SELF_CONTAINED_TAGS: &[&str] = &["img", "picture", "table", "hr"];

/// Tags kept as the presentation tag of text blocks.
const PASSTHROUGH_TAGS: &[&str] = &["p", "li", "blockquote", "hr"];

/// Default number of visible characters in the dedup signature.
pub const DEFAULT_DEDUP_PREFIX_CHARS: usize = 220;

/// A classified block, ready to become a paragraph.
#[derive(Debug, Clone)]
pub struct ParsedBlock {
    /// Content classification
    pub paragraph_type: ParagraphType,
    /// Normalized presentation tag
    pub element: String,
    /// Primary-language chunk
    pub primary: SanitizedChunk,
    /// Secondary-language chunk
    pub secondary: SanitizedChunk,
    /// Type-specific metadata (heading anchor filled in later)
    pub metadata: ParagraphMetadata,
    /// Deduplication signature
    pub signature: String,
    element_id: Option<String>,
}

impl ParsedBlock {
    /// Visible text, primary preferred.
    pub fn visible_text(&self) -> &str {
        if self.primary.text.is_empty() {
            &self.secondary.text
        } else {
            &self.primary.text
        }
    }

    /// Build the final paragraph record at a document position.
    pub fn into_paragraph(self, index: usize) -> ParagraphData {
        let id = hash::paragraph_id(&self.signature, index);
        let visible = self.visible_text().to_string();

        let mut metadata = self.metadata;
        if self.paragraph_type == ParagraphType::Heading {
            let anchor = self
                .element_id
                .unwrap_or_else(|| hash::anchor_id(&visible, index));
            metadata.anchor_id = Some(anchor);
        }

        let mut sentences = if self.paragraph_type == ParagraphType::Code {
            vec![Sentence::new(
                code_text(&self.primary.raw_text),
                code_text(&self.secondary.raw_text),
            )]
        } else {
            sentence::align(&self.primary.text, &self.secondary.text)
        };
        if sentences.is_empty() && !(self.primary.html.is_empty() && self.secondary.html.is_empty())
        {
            sentences.push(Sentence::default());
        }

        let citations = if self.paragraph_type == ParagraphType::Code {
            Vec::new()
        } else {
            extract_citations(&visible)
        };

        ParagraphData {
            id,
            paragraph_type: self.paragraph_type,
            element: self.element,
            en_text: self.primary.html,
            ko_text: self.secondary.html,
            sentences,
            citations,
            index,
            metadata,
            is_reference: is_reference_text(&visible),
        }
    }
}

fn code_text(raw: &str) -> String {
    raw.trim_start_matches(['\n', '\r']).trim_end().to_string()
}

/// Parses collected blocks against one document's base reference.
#[derive(Debug, Clone)]
pub struct BlockParser<'a> {
    matcher: &'a OverlayMatcher,
    base_dir: String,
    dedup_prefix_chars: usize,
}

impl<'a> BlockParser<'a> {
    /// Create a parser; `base_reference` only serves relative image resolution.
    pub fn new(matcher: &'a OverlayMatcher, base_reference: &str) -> Self {
        Self {
            matcher,
            base_dir: base_directory(base_reference).to_string(),
            dedup_prefix_chars: DEFAULT_DEDUP_PREFIX_CHARS,
        }
    }

    /// Set the visible-text prefix length used in dedup signatures.
    pub fn with_dedup_prefix_chars(mut self, chars: usize) -> Self {
        self.dedup_prefix_chars = chars;
        self
    }

    /// Parse one block. Returns `None` for blocks with nothing to show.
    pub fn parse(&self, dom: &Dom, block: NodeId) -> Option<ParsedBlock> {
        let tag = dom.tag(block)?.to_ascii_lowercase();

        let (mut primary_dom, copy) = dom.subtree(block);
        let mut secondary_dom = self.split_bilingual(&mut primary_dom, copy);

        for tree in [&mut primary_dom, &mut secondary_dom] {
            self.resolve_image_sources(tree);
        }

        let content = if SELF_CONTAINED_TAGS.contains(&tag.as_str()) {
            primary_dom.root()
        } else {
            copy
        };
        let table_source = primary_dom
            .find_tag(copy, &["table"])
            .map(|_| primary_dom.clone());

        let primary = sanitize(
            &mut primary_dom,
            content,
            self.matcher,
            SanitizeOptions::default(),
        );
        let secondary_root = secondary_dom.root();
        let secondary = sanitize(
            &mut secondary_dom,
            secondary_root,
            self.matcher,
            SanitizeOptions::default(),
        );

        let root = primary_dom.root();
        let paragraph_type = classify(&tag, &primary_dom, root, &primary, &secondary);

        let (primary, metadata) = match paragraph_type {
            ParagraphType::Heading => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                (primary, ParagraphMetadata::heading(level, String::new()))
            }
            ParagraphType::Table => {
                // Tables keep vector content that is stripped elsewhere
                let primary = match table_source {
                    Some(mut tree) => sanitize(
                        &mut tree,
                        content,
                        self.matcher,
                        SanitizeOptions {
                            keep_vector_graphics: true,
                        },
                    ),
                    None => primary,
                };
                let caption = table_caption(&primary_dom, root);
                (primary, ParagraphMetadata::table(caption))
            }
            ParagraphType::Image => {
                let metadata = image_metadata(&primary_dom, root)
                    .or_else(|| {
                        let secondary_root = secondary_dom.root();
                        image_metadata(&secondary_dom, secondary_root)
                    })
                    .unwrap_or_else(|| ParagraphMetadata::image("", "", ""));
                (primary, metadata)
            }
            ParagraphType::Code | ParagraphType::Text => (primary, ParagraphMetadata::default()),
        };

        let has_media = matches!(paragraph_type, ParagraphType::Image | ParagraphType::Table);
        if primary.is_blank() && secondary.is_blank() && !has_media && tag != "hr" {
            return None;
        }

        let element = normalize_tag(&tag, paragraph_type);
        let signature = self.signature(paragraph_type, &element, &primary, &secondary, &metadata);
        let element_id = dom
            .attr(block, "id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Some(ParsedBlock {
            paragraph_type,
            element,
            primary,
            secondary,
            metadata,
            signature,
            element_id,
        })
    }

    /// Move overlay translations out of the block clone into a new tree.
    ///
    /// Only top-level wrappers are taken so nested overlay markup is not
    /// counted twice. Returns the secondary-language tree.
    fn split_bilingual(&self, primary: &mut Dom, copy: NodeId) -> Dom {
        let matcher = self.matcher;
        let is_wrapper = |d: &Dom, n: NodeId| d.element(n).is_some() && matcher.is_wrapper(d.class(n));

        let wrappers: Vec<NodeId> = primary
            .find_all(copy, |d, n| is_wrapper(d, n))
            .into_iter()
            .filter(|&w| !primary.ancestors(w).any(|a| is_wrapper(primary, a)))
            .collect();

        let mut secondary = Dom::new();
        let secondary_root = secondary.root();

        for wrapper in wrappers {
            let inners = primary.find_all(wrapper, |d, n| {
                d.element(n).is_some() && matcher.is_inner(d.class(n))
            });
            let sources = if inners.is_empty() { vec![wrapper] } else { inners };

            for source in sources {
                if !secondary.children(secondary_root).is_empty() {
                    secondary.append(secondary_root, NodeData::Text(" ".to_string()));
                }
                for child in trim_line_breaks(primary, source) {
                    secondary.import_subtree(primary, child, secondary_root);
                }
            }
            primary.detach(wrapper);
        }

        let strays = primary.find_all(copy, |d, n| {
            d.element(n).is_some() && matcher.is_translation_block(d.class(n))
        });
        for stray in strays {
            primary.detach(stray);
        }

        secondary
    }

    fn resolve_image_sources(&self, tree: &mut Dom) {
        let root = tree.root();
        let images = tree.find_all(root, |d, n| d.is_tag(n, &["img"]));
        for img in images {
            if let Some(src) = tree.attr(img, "src") {
                let resolved = resolve_src(src, &self.base_dir);
                tree.set_attr(img, "src", resolved);
            }
        }
    }

    fn signature(
        &self,
        paragraph_type: ParagraphType,
        element: &str,
        primary: &SanitizedChunk,
        secondary: &SanitizedChunk,
        metadata: &ParagraphMetadata,
    ) -> String {
        let visible = if !primary.text.is_empty() {
            primary.text.as_str()
        } else if !secondary.text.is_empty() {
            secondary.text.as_str()
        } else {
            metadata.src.as_deref().unwrap_or("")
        };
        let lower = visible.to_lowercase();
        format!(
            "{}|{}|{}",
            paragraph_type.as_str(),
            element,
            text::prefix_chars(&lower, self.dedup_prefix_chars)
        )
    }
}

/// Children of `node` without one leading and one trailing `<br>`.
fn trim_line_breaks(dom: &Dom, node: NodeId) -> Vec<NodeId> {
    let mut children: Vec<NodeId> = dom.children(node).to_vec();
    let is_blank = |n: NodeId| dom.text(n).map(|t| t.trim().is_empty()).unwrap_or(false);

    if let Some(first) = children.iter().position(|&c| !is_blank(c)) {
        if dom.is_tag(children[first], &["br"]) {
            children.remove(first);
        }
    }
    if let Some(last) = children.iter().rposition(|&c| !is_blank(c)) {
        if dom.is_tag(children[last], &["br"]) {
            children.remove(last);
        }
    }
    children
}

fn classify(
    tag: &str,
    dom: &Dom,
    root: NodeId,
    primary: &SanitizedChunk,
    secondary: &SanitizedChunk,
) -> ParagraphType {
    if HEADING_TAGS.contains(&tag) {
        ParagraphType::Heading
    } else if tag == "pre" || tag == "code" {
        ParagraphType::Code
    } else if dom.find_tag(root, &["table"]).is_some() {
        ParagraphType::Table
    } else if dom.find_tag(root, &["img"]).is_some() {
        ParagraphType::Image
    } else if primary.text.is_empty()
        && (contains_img_markup(&primary.html) || contains_img_markup(&secondary.html))
    {
        ParagraphType::Image
    } else {
        ParagraphType::Text
    }
}

fn contains_img_markup(html: &str) -> bool {
    html.to_ascii_lowercase().contains("<img")
}

/// Map the original tag to the presentation tag reported for a type.
pub fn normalize_tag(tag: &str, paragraph_type: ParagraphType) -> String {
    let normalized = match paragraph_type {
        ParagraphType::Heading => tag,
        ParagraphType::Table => "table",
        ParagraphType::Image => match tag {
            "figure" | "picture" | "img" => tag,
            _ => "figure",
        },
        ParagraphType::Code => "pre",
        ParagraphType::Text if PASSTHROUGH_TAGS.contains(&tag) => tag,
        ParagraphType::Text => "div",
    };
    normalized.to_string()
}

fn image_metadata(dom: &Dom, root: NodeId) -> Option<ParagraphMetadata> {
    let img = dom.find_tag(root, &["img"])?;
    let src = dom.attr(img, "src").unwrap_or("");
    let alt = dom.attr(img, "alt").unwrap_or("");

    let caption = match dom.find_tag(root, &["figcaption"]) {
        Some(figcaption) => text::normalize(&dom.visible_text(figcaption)),
        None => dom.attr(img, "title").map(text::normalize).unwrap_or_default(),
    };

    Some(ParagraphMetadata::image(src, alt, caption))
}

fn table_caption(dom: &Dom, root: NodeId) -> String {
    let caption = dom.find_tag(root, &["caption"]).or_else(|| {
        dom.find_all(root, |d, n| {
            d.element(n).is_some() && d.class(n).to_ascii_lowercase().contains("caption")
        })
        .into_iter()
        .next()
    });
    caption
        .map(|c| text::normalize(&dom.visible_text(c)))
        .unwrap_or_default()
}

/// Directory part of a base reference (path or URL), without the trailing slash.
pub fn base_directory(base_reference: &str) -> &str {
    let base = base_reference
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim();
    match base.rfind(['/', '\\']) {
        Some(pos) => &base[..pos],
        None => "",
    }
}

/// Resolve an image source against a base directory.
///
/// Absolute URLs, embedded data, blob and file sources, and root- or
/// protocol-relative paths are returned unchanged.
pub fn resolve_src(src: &str, base_dir: &str) -> String {
    let src = src.trim();
    if src.is_empty() || base_dir.is_empty() || is_absolute_src(src) {
        return src.to_string();
    }
    let relative = src.trim_start_matches("./");
    format!("{}/{}", base_dir.trim_end_matches(['/', '\\']), relative)
}

fn is_absolute_src(src: &str) -> bool {
    if src.starts_with('/') || src.starts_with('\\') {
        return true;
    }
    // Any URI scheme ("https:", "data:", "blob:", "file:", ...)
    match src.find(':') {
        Some(pos) if pos > 1 => src[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    fn parse_one(html: &str, base: &str) -> Option<ParagraphData> {
        let dom = Dom::parse_fragment(html);
        let matcher = OverlayMatcher::default();
        let parser = BlockParser::new(&matcher, base);
        let block = dom.element_children(dom.root()).next()?;
        parser.parse(&dom, block).map(|b| b.into_paragraph(0))
    }

    const WRAPPER: &str = concat!(
        "<font class=\"notranslate immersive-translate-target-wrapper\" lang=\"ko\"><br>",
        "<font class=\"notranslate immersive-translate-target-translation-block-wrapper\">",
        "<font class=\"notranslate immersive-translate-target-inner\">",
    );

    // ==================== Bilingual Split Tests ====================

    #[test]
    fn test_split_bilingual_paragraph() {
        let html = format!(
            "<p>We propose a model. It works.{}모델을 제안한다. 잘 작동한다.</font></font></font></p>",
            WRAPPER
        );
        let p = parse_one(&html, "").unwrap();

        assert_eq!(p.paragraph_type, ParagraphType::Text);
        assert_eq!(p.element, "p");
        assert_eq!(p.en_text, "We propose a model. It works.");
        assert_eq!(p.ko_text, "모델을 제안한다. 잘 작동한다.");
        assert_eq!(p.sentences.len(), 2);
        assert_eq!(p.sentences[1].ko, "잘 작동한다.");
    }

    #[test]
    fn test_wrapper_without_inner_trims_line_breaks() {
        let html = concat!(
            "<div>Text<span class=\"immersive-translate-target-wrapper\">",
            "<br>번역<br></span></div>"
        );
        let p = parse_one(html, "").unwrap();
        assert_eq!(p.en_text, "Text");
        assert_eq!(p.ko_text, "번역");
        assert_eq!(p.element, "div");
    }

    #[test]
    fn test_stray_translation_block_removed() {
        let html = concat!(
            "<p>Only english",
            "<span class=\"immersive-translate-target-translation-block-wrapper\">x</span></p>"
        );
        let p = parse_one(html, "").unwrap();
        assert_eq!(p.en_text, "Only english");
        assert!(!p.has_translation());
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_heading_classification() {
        let p = parse_one("<h2 id=\"method\">Method</h2>", "").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Heading);
        assert_eq!(p.element, "h2");
        assert_eq!(p.heading_level(), Some(2));
        assert_eq!(p.metadata.anchor_id.as_deref(), Some("method"));
    }

    #[test]
    fn test_heading_anchor_computed() {
        let p = parse_one("<h3>Results</h3>", "").unwrap();
        assert_eq!(p.metadata.anchor_id, Some(hash::anchor_id("Results", 0)));
    }

    #[test]
    fn test_code_keeps_line_breaks() {
        let p = parse_one("<pre><code>fn main() {\n    run([1]);\n}\n</code></pre>", "").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Code);
        assert_eq!(p.element, "pre");
        assert_eq!(p.sentences.len(), 1);
        assert_eq!(p.sentences[0].en, "fn main() {\n    run([1]);\n}");
        assert!(p.citations.is_empty());
    }

    #[test]
    fn test_figure_with_caption() {
        let html = "<figure><img src=\"img/a.png\" alt=\"Arch\"><figcaption>Figure 1: Overview</figcaption></figure>";
        let p = parse_one(html, "papers/x/index.html").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Image);
        assert_eq!(p.element, "figure");
        assert_eq!(p.metadata.src.as_deref(), Some("papers/x/img/a.png"));
        assert_eq!(p.metadata.alt.as_deref(), Some("Arch"));
        assert_eq!(p.metadata.caption.as_deref(), Some("Figure 1: Overview"));
        assert!(p.en_text.contains("src=\"papers/x/img/a.png\""));
    }

    #[test]
    fn test_bare_image_uses_title_caption() {
        let p = parse_one("<img src=\"https://x.org/a.png\" title=\"Plot\">", "base/doc.html").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Image);
        assert_eq!(p.element, "img");
        assert_eq!(p.metadata.src.as_deref(), Some("https://x.org/a.png"));
        assert_eq!(p.metadata.caption.as_deref(), Some("Plot"));
        assert_eq!(p.sentences.len(), 1);
    }

    #[test]
    fn test_image_inside_div_reports_figure() {
        let p = parse_one("<div><img src=\"a.png\"></div>", "").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Image);
        assert_eq!(p.element, "figure");
    }

    #[test]
    fn test_table_with_caption() {
        let html = "<table><caption>Table 1: Scores</caption><tr><td>0.9</td></tr></table>";
        let p = parse_one(html, "").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Table);
        assert_eq!(p.element, "table");
        assert_eq!(p.metadata.caption.as_deref(), Some("Table 1: Scores"));
        assert!(p.en_text.starts_with("<table>"));
    }

    #[test]
    fn test_table_keeps_vector_graphics() {
        let html = "<div><table><tr><td><svg><path d=\"M0\"></path></svg></td></tr></table><div class=\"ltx_caption\">Results</div></div>";
        let p = parse_one(html, "").unwrap();
        assert_eq!(p.paragraph_type, ParagraphType::Table);
        assert!(p.en_text.contains("<svg>"));
        assert_eq!(p.metadata.caption.as_deref(), Some("Results"));
    }

    #[test]
    fn test_empty_block_suppressed() {
        assert!(parse_one("<div>   <span> </span></div>", "").is_none());
        assert!(parse_one("<hr>", "").is_some());
    }

    #[test]
    fn test_reference_term_flags_block() {
        let p = parse_one("<p>See the references below [3].</p>", "").unwrap();
        assert!(p.is_reference);
        assert_eq!(p.citations.len(), 1);
        assert_eq!(p.plain_text(Language::Primary), "See the references below [3].");
    }

    // ==================== Path Resolution Tests ====================

    #[test]
    fn test_resolve_src() {
        assert_eq!(resolve_src("fig/a.png", "docs/paper"), "docs/paper/fig/a.png");
        assert_eq!(resolve_src("./a.png", "docs/"), "docs/a.png");
        assert_eq!(resolve_src("/abs/a.png", "docs"), "/abs/a.png");
        assert_eq!(resolve_src("//cdn.org/a.png", "docs"), "//cdn.org/a.png");
        assert_eq!(resolve_src("data:image/png;base64,AA", "docs"), "data:image/png;base64,AA");
        assert_eq!(resolve_src("blob:abc", "docs"), "blob:abc");
        assert_eq!(resolve_src("a.png", ""), "a.png");
    }

    #[test]
    fn test_base_directory() {
        assert_eq!(base_directory("/home/u/paper.html"), "/home/u");
        assert_eq!(base_directory("https://x.org/p/index.html?v=1"), "https://x.org/p");
        assert_eq!(base_directory("paper.html"), "");
        assert_eq!(base_directory(""), "");
    }

    #[test]
    fn test_windows_drive_is_not_a_scheme() {
        assert!(!is_absolute_src("C:\\img\\a.png"));
        assert!(is_absolute_src("file:///tmp/a.png"));
    }
}
