//! Micro-benchmark for backoff calculation: confirms the jittered path
//! (one RNG draw per call) stays cheap enough to sit on the hot retry loop.

use clew_util::retry::{calculate_backoff_with_rng, RetryConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_backoff(c: &mut Criterion) {
    let cfg = RetryConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("calculate_backoff_with_jitter", |b| {
        b.iter(|| black_box(calculate_backoff_with_rng(black_box(&cfg), black_box(4), &mut rng)));
    });
}

criterion_group!(benches, bench_backoff);
criterion_main!(benches);
