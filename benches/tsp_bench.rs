//! Criterion benchmarks for the tour optimizers.
//!
//! Uses synthetic Euclidean instances (uniform points in a 100×100 square)
//! so timings reflect algorithm overhead only.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use tsp_metaheur::de::{DeConfig, DeRunner};
use tsp_metaheur::ga::{CrossoverMethod, GaConfig, GaRunner};
use tsp_metaheur::random::create_rng;
use tsp_metaheur::sa::{SaConfig, SaRunner};
use tsp_metaheur::shortest_path::floyd_warshall;
use tsp_metaheur::DistanceMatrix;

fn uniform_instance(n: usize, seed: u64) -> DistanceMatrix {
    let mut rng = create_rng(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect();
    DistanceMatrix::euclidean(&points)
}

// ===========================================================================
// GA
// ===========================================================================

fn bench_ga(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga");
    group.sample_size(10);

    for &n in &[20, 50] {
        let matrix = uniform_instance(n, 1);
        for crossover in [CrossoverMethod::Ox, CrossoverMethod::Pmx, CrossoverMethod::Erx] {
            let config = GaConfig::default()
                .with_population_size(50)
                .with_generations(50)
                .with_crossover(crossover)
                .with_seed(42);
            group.bench_with_input(
                BenchmarkId::new(format!("{crossover:?}"), n),
                &(&matrix, config),
                |b, (m, c)| {
                    b.iter(|| {
                        let result = GaRunner::run(black_box(m), black_box(c));
                        black_box(result)
                    })
                },
            );
        }
    }
    group.finish();
}

// ===========================================================================
// SA
// ===========================================================================

fn bench_sa(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa");
    group.sample_size(10);

    for &n in &[20, 50, 100] {
        let matrix = uniform_instance(n, 2);
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_final_temperature(0.01)
            .with_max_iterations(10_000)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(&matrix, config), |b, (m, c)| {
            b.iter(|| {
                let result = SaRunner::run(black_box(m), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

// ===========================================================================
// DE
// ===========================================================================

fn bench_de(c: &mut Criterion) {
    let mut group = c.benchmark_group("de");
    group.sample_size(10);

    for &n in &[20, 50] {
        let matrix = uniform_instance(n, 3);
        let config = DeConfig::default()
            .with_population_size(50)
            .with_generations(50)
            .with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(&matrix, config), |b, (m, c)| {
            b.iter(|| {
                let result = DeRunner::run(black_box(m), black_box(c));
                black_box(result)
            })
        });
    }
    group.finish();
}

// ===========================================================================
// Floyd–Warshall
// ===========================================================================

fn bench_floyd_warshall(c: &mut Criterion) {
    let mut group = c.benchmark_group("floyd_warshall");

    for &n in &[50, 100, 200] {
        // Sparse ring plus chords: most pairs need relaxation.
        let matrix = DistanceMatrix::from_fn(n, |i, j| {
            if i == j {
                0.0
            } else if (i + 1) % n == j || (i * 7 + 3) % n == j {
                ((i * 31 + j * 17) % 20 + 1) as f64
            } else {
                f64::INFINITY
            }
        });
        group.bench_with_input(BenchmarkId::from_parameter(n), &matrix, |b, m| {
            b.iter(|| black_box(floyd_warshall(black_box(m))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ga, bench_sa, bench_de, bench_floyd_warshall);
criterion_main!(benches);
