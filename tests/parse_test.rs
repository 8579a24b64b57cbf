//! Integration tests for the parsing pipeline.

use std::fs;

use unpaper::{
    content_key, parse, parse_batch, parse_file, parse_with_options, Error, Language,
    ParagraphType, ParseOptions,
};

const WRAPPER_OPEN: &str = concat!(
    "<font class=\"notranslate immersive-translate-target-wrapper\" lang=\"ko\"><br>",
    "<font class=\"notranslate immersive-translate-target-translation-block-wrapper\">",
    "<font class=\"notranslate immersive-translate-target-inner\">",
);
const WRAPPER_CLOSE: &str = "</font></font></font>";

fn bilingual(tag: &str, en: &str, ko: &str) -> String {
    format!("<{tag}>{en}{WRAPPER_OPEN}{ko}{WRAPPER_CLOSE}</{tag}>")
}

fn sample_paper() -> String {
    format!(
        concat!(
            "<html><head><title>x</title><style>p {{ color: red; }}</style></head><body>",
            "<nav class=\"immersive-translate-popup\">Translate this page</nav>",
            "<article>",
            "{}",
            "<p>Prior work [1] and [1, 2] shows this.</p>",
            "{}",
            "<figure><img src=\"img/arch.png\" alt=\"Architecture\">",
            "<figcaption>Figure 1: Overview</figcaption></figure>",
            "<table><caption>Table 1: Scores</caption><tr><td>0.91</td></tr></table>",
            "<h2>References</h2>",
            "<p>[1] A. Author, A title. 2020.</p>",
            "<p>[2] B. Author, Another title. 2021.</p>",
            "</article></body></html>"
        ),
        bilingual("h2", "Method", "방법"),
        bilingual("p", "We propose a model. It works well.", "모델을 제안한다. 잘 작동한다."),
    )
}

// ==================== Idempotence Tests ====================

#[test]
fn test_parse_is_idempotent() {
    let raw = sample_paper();
    let first = parse(&raw, "papers/2401.00001/index.html");
    let second = parse(&raw, "papers/2401.00001/index.html");

    assert_eq!(first, second);
    let ids: Vec<&str> = first.paragraphs.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.iter().all(|id| id.starts_with("p-") && id.len() == 10));
}

#[test]
fn test_indices_follow_document_order() {
    let paper = parse(&sample_paper(), "");
    for (i, paragraph) in paper.paragraphs.iter().enumerate() {
        assert_eq!(paragraph.index, i);
    }
}

// ==================== Non-empty Guarantee Tests ====================

#[test]
fn test_non_empty_guarantee() {
    for raw in ["", "   ", "<html></html>", "<<<>>>", "<div><span></span></div>", "plain words"] {
        let paper = parse(raw, "");
        assert!(!paper.is_empty(), "no paragraphs for {:?}", raw);
    }
}

#[test]
fn test_strict_mode_reports_size_limit() {
    let options = ParseOptions::new().strict().with_max_input_bytes(8);
    let result = parse_with_options(&sample_paper(), "", options);
    assert!(matches!(result, Err(Error::InputTooLarge { limit: 8, .. })));
}

// ==================== Noise Removal Tests ====================

#[test]
fn test_overlay_and_head_noise_removed() {
    let paper = parse(&sample_paper(), "");
    let text = paper.plain_text(Language::Primary);
    assert!(!text.contains("Translate this page"));
    assert!(!text.contains("color: red"));
}

#[test]
fn test_class_sharing_framework_letters_is_kept() {
    let raw = concat!(
        "<article><div class=\"important-note\"><p>Key result text here.</p></div>",
        "<p class=\"relevant-work\">Other text.</p></article>"
    );
    let paper = parse(raw, "");
    let texts: Vec<String> = paper
        .paragraphs
        .iter()
        .map(|p| p.plain_text(Language::Primary))
        .collect();

    assert_eq!(texts, vec!["Key result text here.", "Other text."]);
}

#[test]
fn test_framework_prefixed_container_removed() {
    let raw = "<article><div class=\"ant-modal\"><p>Sign in.</p></div><p>Body.</p></article>";
    let paper = parse(raw, "");
    assert_eq!(paper.plain_text(Language::Primary), "Body.");
}

// ==================== Dedup Tests ====================

#[test]
fn test_repeated_block_is_dropped() {
    let block = bilingual("p", "The same block appears twice.", "같은 블록이 두 번 나온다.");
    let raw = format!("<article>{block}{block}<p>Next block.</p></article>");
    let paper = parse(&raw, "");

    assert_eq!(paper.len(), 2);
    assert_eq!(paper.paragraphs[0].ko_text, "같은 블록이 두 번 나온다.");
    assert_eq!(paper.paragraphs[1].plain_text(Language::Primary), "Next block.");
}

// ==================== Sentence Alignment Tests ====================

#[test]
fn test_equal_sentence_counts_pair_up() {
    let paper = parse(&sample_paper(), "");
    let para = paper
        .paragraphs
        .iter()
        .find(|p| p.has_translation() && p.paragraph_type == ParagraphType::Text)
        .unwrap();

    assert_eq!(para.sentences.len(), 2);
    assert_eq!(para.sentences[0].en, "We propose a model.");
    assert_eq!(para.sentences[0].ko, "모델을 제안한다.");
    assert_eq!(para.sentences[1].ko, "잘 작동한다.");
}

#[test]
fn test_line_break_separates_sentences() {
    let raw = bilingual("p", "First line.<br>Second line.", "모델을 제안한다. 잘 작동한다.");
    let paper = parse(&raw, "");

    let para = &paper.paragraphs[0];
    assert_eq!(para.sentences.len(), 2);
    assert_eq!(para.sentences[0].en, "First line.");
    assert_eq!(para.sentences[1].en, "Second line.");
}

#[test]
fn test_hint_container_keeps_heading_apart() {
    let raw = "<div class=\"ltx_abstract\"><h6>Abstract</h6><p>We study. It works.</p></div>";
    let paper = parse(raw, "");
    assert_eq!(
        paper.paragraphs[0].plain_text(Language::Primary),
        "Abstract We study. It works."
    );
}

#[test]
fn test_unequal_sentence_counts_collapse() {
    let raw = bilingual(
        "p",
        "We propose a model. It works well.",
        "모델을 제안하고 잘 작동함을 보인다.",
    );
    let paper = parse(&raw, "");

    assert_eq!(paper.len(), 1);
    let para = &paper.paragraphs[0];
    assert_eq!(para.sentences.len(), 1);
    assert_eq!(para.sentences[0].en, "We propose a model. It works well.");
    assert_eq!(para.sentences[0].ko, "모델을 제안하고 잘 작동함을 보인다.");
}

// ==================== Citation Tests ====================

#[test]
fn test_numeric_citation_resolves_to_reference() {
    let paper = parse(&sample_paper(), "");
    let body = paper
        .paragraphs
        .iter()
        .find(|p| p.plain_text(Language::Primary).starts_with("Prior work"))
        .unwrap();
    let entry = paper
        .paragraphs
        .iter()
        .find(|p| p.plain_text(Language::Primary).starts_with("[1] A. Author"))
        .unwrap();

    assert_eq!(body.citations.len(), 2);
    assert_eq!(body.citations[0].id, "[1]");
    assert_eq!(body.citations[0].paragraph_id.as_deref(), Some(entry.id.as_str()));
    assert_eq!(body.citations[1].id, "[1, 2]");
    assert!(body.citations[1].paragraph_id.is_none());

    assert!(entry.is_reference);
    assert!(!body.is_reference);
    assert_eq!(paper.references().count(), 3);
}

// ==================== Structure Tests ====================

#[test]
fn test_heading_extraction() {
    let paper = parse(&sample_paper(), "");
    let heading = paper
        .paragraphs
        .iter()
        .find(|p| p.is_heading() && p.plain_text(Language::Primary) == "Method")
        .unwrap();

    let entry = paper
        .structure
        .toc
        .iter()
        .find(|e| e.text == "Method")
        .unwrap();
    assert_eq!(entry.level, 2);
    assert_eq!(entry.paragraph_id, heading.id);
    assert_eq!(heading.ko_text, "방법");
}

#[test]
fn test_figure_and_table_indices() {
    let paper = parse(&sample_paper(), "papers/2401.00001/index.html");

    assert_eq!(paper.structure.figures.len(), 1);
    let figure = &paper.structure.figures[0];
    assert_eq!(figure.number, 1);
    assert_eq!(figure.src, "papers/2401.00001/img/arch.png");
    assert_eq!(figure.caption, "Figure 1: Overview");

    assert_eq!(paper.structure.tables.len(), 1);
    assert_eq!(paper.structure.tables[0].caption, "Table 1: Scores");
}

// ==================== Light Markup Tests ====================

#[test]
fn test_fenced_code_round_trip() {
    let raw = "# Setup\n\nInstall first.\n\n```\nif a < b && c {\n    run();\n}\n```\n";
    let paper = parse(raw, "");

    let code = paper
        .paragraphs
        .iter()
        .find(|p| p.paragraph_type == ParagraphType::Code)
        .unwrap();
    assert_eq!(code.sentences.len(), 1);
    assert_eq!(code.sentences[0].en, "if a < b && c {\n    run();\n}");
    assert!(code.citations.is_empty());

    assert_eq!(paper.paragraphs[0].paragraph_type, ParagraphType::Heading);
    assert_eq!(paper.structure.toc[0].level, 1);
}

// ==================== File and Batch Tests ====================

#[test]
fn test_parse_file_uses_path_as_base() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.html");
    fs::write(
        &path,
        "<figure><img src=\"fig.png\"><figcaption>Figure 1: Setup</figcaption></figure>",
    )
    .unwrap();

    let paper = parse_file(&path).unwrap();
    let src = paper.paragraphs[0].metadata.src.as_deref().unwrap();
    assert!(src.ends_with("fig.png"));
    assert!(src.len() > "fig.png".len());
}

#[test]
fn test_parse_batch_preserves_order() {
    let inputs = vec![
        ("<p>First paper.</p>".to_string(), "a.html".to_string()),
        (sample_paper(), "b.html".to_string()),
        ("<p>Third paper.</p>".to_string(), "c.html".to_string()),
    ];
    let papers = parse_batch(&inputs);

    assert_eq!(papers.len(), 3);
    for ((raw, base), paper) in inputs.iter().zip(&papers) {
        assert_eq!(paper, &parse(raw, base));
    }
}

#[test]
fn test_content_key_is_md5() {
    assert_eq!(content_key(""), "d41d8cd98f00b204e9800998ecf8427e");
}
