//! Benchmarks for printsheet layout and export.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use printsheet::{
    compute_layout, Block, Columns, ExportOptions, ExporterRegistry, FormatOptions, Question,
    QuestionKind,
};

/// Creates a worksheet mixing every block type.
fn create_blocks(count: usize) -> Vec<Block> {
    (0..count)
        .map(|i| match i % 5 {
            0 => Block::passage(
                format!("p{}", i),
                "다음 글을 읽고 물음에 답하시오. The passage continues here. ".repeat(6),
            ),
            1 => Block::question(
                format!("q{}", i),
                Question::multiple_choice(["first", "second", "third", "fourth", "fifth"]),
                "Which statement best matches the passage?",
            ),
            2 => Block::question(
                format!("q{}", i),
                Question::new(QuestionKind::ShortAnswer),
                "Write the missing word.",
            ),
            3 => Block::concept(format!("c{}", i), "A key concept with a short definition."),
            _ => Block::question(
                format!("q{}", i),
                Question::new(QuestionKind::Essay),
                "Explain your reasoning in full sentences.",
            ),
        })
        .collect()
}

/// Benchmark layout at various sizes.
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [10, 100, 500].iter() {
        let blocks = create_blocks(*count);

        group.bench_function(format!("{}_blocks_one_column", count), |b| {
            let options = FormatOptions::default();
            b.iter(|| compute_layout(black_box(&blocks), &options));
        });

        group.bench_function(format!("{}_blocks_two_columns", count), |b| {
            let options = FormatOptions::new().with_columns(Columns::Two);
            b.iter(|| compute_layout(black_box(&blocks), &options));
        });
    }

    group.finish();
}

/// Benchmark the text-based exporters on a laid-out document.
fn bench_export(c: &mut Criterion) {
    let doc = compute_layout(&create_blocks(100), &FormatOptions::default());
    let registry = ExporterRegistry::with_defaults();
    let options = ExportOptions::default().with_parallel(false);

    for format in ["txt", "html", "json"] {
        c.bench_function(&format!("export_{}", format), |b| {
            b.iter(|| registry.export(format, black_box(&doc), &options).unwrap());
        });
    }
}

criterion_group!(benches, bench_layout, bench_export);
criterion_main!(benches);
