//! Criterion benchmarks for `ab-math`.
//!
//! Focus on the kernels that dominate an analysis call: the Beta quantile
//! behind credible intervals and the beta variate behind Monte Carlo loops.

use ab_math::math::beta::{beta_inv_cdf, incomplete_beta_regularized};
use ab_math::variate::beta_variate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_beta_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("beta");

    // Posterior regimes seen in conversion tests.
    for (name, alpha, beta) in [
        ("uniform", 1.0, 1.0),
        ("low_traffic", 3.0, 48.0),
        ("five_percent", 51.0, 951.0),
        ("high_traffic", 501.0, 9501.0),
    ] {
        group.bench_with_input(
            BenchmarkId::new("incomplete_beta", name),
            &(alpha, beta),
            |b, &(a, bta)| {
                b.iter(|| {
                    let x = a / (a + bta);
                    black_box(incomplete_beta_regularized(black_box(x), black_box(a), black_box(bta)));
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("beta_inv_cdf", name),
            &(alpha, beta),
            |b, &(a, bta)| {
                b.iter(|| {
                    black_box(beta_inv_cdf(black_box(0.975), black_box(a), black_box(bta)));
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("beta_variate", name),
            &(alpha, beta),
            |b, &(a, bta)| {
                let mut rng = StdRng::seed_from_u64(0xab);
                b.iter(|| {
                    black_box(beta_variate(&mut rng, black_box(a), black_box(bta)));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_beta_kernels);
criterion_main!(benches);
