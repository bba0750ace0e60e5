//! Micro-benchmarks for the source-text pattern engine: how `apply`'s
//! keyword-bucketed scan scales with source size across the five
//! supported languages.

use clew_extract::patterns::apply;
use clew_extract::Language;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn synthetic_source(lines: usize) -> String {
    let mut out = String::with_capacity(lines * 32);
    for i in 0..lines {
        out.push_str(&format!(
            "fn handler_{i}() {{ let query = format!(\"SELECT {{}}\", input); }}\n"
        ));
    }
    out
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_apply");
    for lines in [100usize, 1_000, 10_000] {
        let source = synthetic_source(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &source, |b, source| {
            b.iter(|| {
                let mut next_id = 0u64;
                black_box(apply(black_box(source), Language::Rust, &[], &mut next_id))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
