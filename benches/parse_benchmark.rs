//! Benchmarks for unpaper parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks parse synthetic bilingual papers of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WRAPPER_OPEN: &str = concat!(
    "<font class=\"notranslate immersive-translate-target-wrapper\" lang=\"ko\"><br>",
    "<font class=\"notranslate immersive-translate-target-translation-block-wrapper\">",
    "<font class=\"notranslate immersive-translate-target-inner\">",
);
const WRAPPER_CLOSE: &str = "</font></font></font>";

/// Creates a synthetic bilingual paper with the given number of sections.
fn create_test_paper(section_count: usize) -> String {
    let mut html = String::from("<html><head><title>Benchmark</title></head><body><article>");

    for i in 0..section_count {
        html.push_str(&format!(
            "<h2>Section {i}{WRAPPER_OPEN}섹션 {i}{WRAPPER_CLOSE}</h2>"
        ));
        for j in 0..8 {
            html.push_str(&format!(
                "<p>Paragraph {j} of section {i} cites prior work [{j}]. It reports results.\
                 {WRAPPER_OPEN}섹션 {i}의 문단 {j}는 선행 연구를 인용한다. 결과를 보고한다.{WRAPPER_CLOSE}</p>"
            ));
        }
        html.push_str(&format!(
            "<figure><img src=\"fig{i}.png\" alt=\"Figure {i}\"><figcaption>Figure {i}: Overview</figcaption></figure>"
        ));
        html.push_str(
            "<span class=\"immersive-translate-popup\">Translate</span>\
             <script type=\"math/tex\">x^2</script><mjx-container>rendered</mjx-container>",
        );
    }

    html.push_str("<h2>References</h2>");
    for j in 0..8 {
        html.push_str(&format!("<p>[{j}] A. Author. Title number {j}. 2024.</p>"));
    }
    html.push_str("</article></body></html>");
    html
}

/// Benchmark source format detection.
fn bench_format_detection(c: &mut Criterion) {
    let html = create_test_paper(1);
    let light = "# Title\n\nBody text.\n\n- item\n";

    c.bench_function("detect_html", |b| {
        b.iter(|| unpaper::detect_source_format(black_box(&html)));
    });

    c.bench_function("detect_light_markup", |b| {
        b.iter(|| unpaper::detect_source_format(black_box(light)));
    });
}

/// Benchmark paper parsing at various sizes.
fn bench_paper_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("paper_parsing");

    for section_count in [1, 10, 50].iter() {
        let html = create_test_paper(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| unpaper::parse(black_box(&html), "papers/bench/index.html"));
        });
    }

    group.finish();
}

/// Benchmark parallel batch parsing.
fn bench_batch_parsing(c: &mut Criterion) {
    let inputs: Vec<(String, String)> = (0..8)
        .map(|i| (create_test_paper(5), format!("papers/{}/index.html", i)))
        .collect();

    c.bench_function("batch_8_papers", |b| {
        b.iter(|| unpaper::parse_batch(black_box(&inputs)));
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_paper_parsing,
    bench_batch_parsing,
);
criterion_main!(benches);
