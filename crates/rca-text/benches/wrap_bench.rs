//! Benchmarks for label wrapping and box sizing.
//!
//! Run with: cargo bench -p rca-text

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rca_text::{BoxMetrics, wrap_text};
use std::hint::black_box;

// =============================================================================
// Test Data
// =============================================================================

/// Prose-like label of roughly `len` bytes.
fn prose(len: usize) -> String {
    "Vaccine carriers are not returned to the district store on time. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// A single unbroken token that must be chunked.
fn long_word(len: usize) -> String {
    "abcdefghij".chars().cycle().take(len).collect()
}

/// Accented text built from combining marks.
fn combining(len: usize) -> String {
    "e\u{0301}a\u{0300} o\u{0302}u\u{0308} ".chars().cycle().take(len).collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap/prose");

    for len in [20, 80, 400, 2000] {
        let text = prose(len);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(wrap_text(text, 20)))
        });
    }

    group.finish();
}

fn bench_wrap_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap/chunked");

    for len in [40, 400] {
        let text = long_word(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(wrap_text(text, 18)))
        });
    }

    group.finish();
}

fn bench_wrap_combining(c: &mut Criterion) {
    let text = combining(400);
    c.bench_function("wrap/combining", |b| b.iter(|| black_box(wrap_text(&text, 20))));
}

fn bench_box_sizing(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");
    let labels: Vec<String> = (0..100).map(|i| prose(10 + i * 3)).collect();

    for (name, metrics) in [
        ("category", BoxMetrics::CATEGORY),
        ("cause", BoxMetrics::CAUSE),
        ("why_card", BoxMetrics::WHY_CARD),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                for label in &labels {
                    black_box(metrics.height_for(label));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_wrap,
    bench_wrap_chunked,
    bench_wrap_combining,
    bench_box_sizing
);
criterion_main!(benches);
