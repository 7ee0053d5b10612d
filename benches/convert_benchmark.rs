//! Benchmarks for mdpdf conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic Markdown and the base-14 fallback font so
//! results do not depend on installed fonts.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mdpdf::{ConvertOptions, Converter, FontRegistry, PdfEmitter, StyleSheet};

/// Creates a synthetic Markdown document with the given number of sections.
fn create_test_markdown(sections: usize) -> String {
    let mut content = String::from("# Benchmark Report\n\n");

    for i in 0..sections {
        content.push_str(&format!("## Section {}\n\n", i + 1));
        content.push_str(
            "This paragraph has **bold**, *italic* and `code` spans, and enough \
             words to wrap across several lines of the text frame.\n\n",
        );
        content.push_str("- first item\n- second item\n- third item\n\n");
        content.push_str("| Name | Value | Note |\n|---|---|---|\n");
        for row in 0..5 {
            content.push_str(&format!("| item {} | {} | ok |\n", row, row * 10));
        }
        content.push_str("\n```\nfn main() {\n    println!(\"hello\");\n}\n```\n\n");
    }

    content
}

fn offline_converter() -> Converter {
    Converter::new(ConvertOptions::new().with_font_candidates(Vec::new()))
}

/// Benchmark Markdown to story conversion.
fn bench_story_building(c: &mut Criterion) {
    let converter = offline_converter();
    let mut group = c.benchmark_group("story_building");

    for sections in [1, 10, 50].iter() {
        let markdown = create_test_markdown(*sections);
        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| converter.build_story(black_box(&markdown)));
        });
    }

    group.finish();
}

/// Benchmark page layout of a prepared story.
fn bench_layout(c: &mut Criterion) {
    let registry = FontRegistry::new();
    let styles = StyleSheet::default();
    let story = mdpdf::build_story(&create_test_markdown(20));
    let emitter = PdfEmitter::new(&registry);

    c.bench_function("layout_20_sections", |b| {
        b.iter(|| emitter.layout(black_box(&story), &styles).unwrap());
    });
}

/// Benchmark the full pipeline to PDF bytes.
fn bench_full_conversion(c: &mut Criterion) {
    let converter = offline_converter();
    let markdown = create_test_markdown(10);

    c.bench_function("convert_10_sections", |b| {
        b.iter(|| converter.convert_str(black_box(&markdown)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_story_building,
    bench_layout,
    bench_full_conversion,
);
criterion_main!(benches);
