use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use siftpage_core::{Document, ImageCandidate, ScoreConfig, extract_text, find_main_content, score_candidates};

/// Builds a page with `sections` blocks, one of them the article body.
fn generate_page(sections: usize) -> String {
    let mut html = String::from("<html><head><title>Bench</title></head><body>");
    for i in 0..sections {
        let class = match i % 4 {
            0 => "sidebar",
            1 => "footer",
            2 if i == sections / 2 => "entry-content",
            _ => "block",
        };
        html.push_str(&format!("<div class=\"{class}\" id=\"s{i}\">"));
        for j in 0..8 {
            html.push_str(&format!("<p>Paragraph {j} of section {i}, with a comma, and another one.</p>"));
        }
        html.push_str(&format!("<img src=\"/img/{i}.png\" width=\"{}\" height=\"120\">", 60 + i % 200));
        html.push_str("</div>");
    }
    html.push_str("</body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for sections in [10, 100, 1000] {
        let html = generate_page(sections);
        group.bench_with_input(BenchmarkId::new("sections", sections), &html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let doc = Document::parse(&generate_page(200));
    let config = ScoreConfig::default();

    c.bench_function("score_candidates", |b| {
        b.iter(|| score_candidates(black_box(&doc), black_box(&config)))
    });
}

fn bench_main_content(c: &mut Criterion) {
    let doc = Document::parse(&generate_page(200));
    let config = ScoreConfig::default();

    c.bench_function("main_content_text_and_images", |b| {
        b.iter(|| {
            let container = find_main_content(black_box(&doc), &config);
            let text = extract_text(container.as_ref());
            let images = container.as_ref().map(ImageCandidate::collect);
            (text, images)
        })
    });
}

criterion_group!(benches, bench_parse, bench_scoring, bench_main_content);
criterion_main!(benches);
