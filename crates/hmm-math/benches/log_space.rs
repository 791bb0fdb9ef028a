//! Criterion benchmarks for `hmm-math`.
//!
//! Focus on the kernels that run S or S² times per time step in the E-step.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hmm_math::{log_add_exp, log_sum_exp, normal_log_pdf};

fn bench_log_space_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_space");

    group.bench_function("log_add_exp", |b| {
        b.iter(|| black_box(log_add_exp(black_box(-3.2), black_box(-1.1))));
    });

    group.bench_function("normal_log_pdf", |b| {
        b.iter(|| black_box(normal_log_pdf(black_box(0.37), black_box(0.0), black_box(1.5))));
    });

    for n_states in [2usize, 4, 16, 64] {
        let values: Vec<f64> = (0..n_states).map(|i| -(i as f64) * 0.75).collect();
        group.bench_with_input(
            BenchmarkId::new("log_sum_exp", n_states),
            &values,
            |b, values| {
                b.iter(|| black_box(log_sum_exp(black_box(values).iter().copied())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_log_space_kernels);
criterion_main!(benches);
