//! Criterion benchmarks for popsim_core numerical kernels.
//!
//! Measures comoving-distance evaluation (pointwise and on sorted grids),
//! clamped linear interpolation and footprint membership tests.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use popsim_core::cosmology::{Cosmology, LambdaCdm};
use popsim_core::math::interpolators::LinearInterpolator;
use popsim_core::sky::Footprint;

/// Benchmark pointwise and cumulative comoving distances.
fn bench_comoving_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("comoving_distance");
    let cosmo = LambdaCdm::flat(70.0, 0.3).unwrap();

    group.bench_function("single_z1", |b| {
        b.iter(|| cosmo.comoving_distance(black_box(1.0)))
    });

    for size in [1_000, 10_000, 100_000] {
        let grid: Vec<f64> = (0..size)
            .map(|i| 0.01 + 0.99 * i as f64 / (size - 1) as f64)
            .collect();
        group.bench_with_input(BenchmarkId::new("sorted_grid", size), &grid, |b, grid| {
            b.iter(|| cosmo.comoving_distances(black_box(grid)))
        });
    }

    group.finish();
}

/// Benchmark clamped lookups against a tabulated CDF.
fn bench_clamped_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("clamped_interpolation");

    for size in [1_000, 100_000] {
        let cdf: Vec<f64> = (0..size).map(|i| i as f64 / (size - 1) as f64).collect();
        let z: Vec<f64> = cdf.iter().map(|p| 0.01 + 0.09 * p * p).collect();
        let interp = LinearInterpolator::new(&cdf, &z).unwrap();
        let queries: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();

        group.bench_with_input(BenchmarkId::new("lookup_1000", size), &interp, |b, interp| {
            b.iter(|| {
                queries
                    .iter()
                    .map(|&u| interp.interpolate_clamped(black_box(u)))
                    .sum::<f64>()
            })
        });
    }

    group.finish();
}

/// Benchmark polygon membership.
fn bench_footprint_contains(c: &mut Criterion) {
    let fp = Footprint::new(vec![
        (0.0, -0.5),
        (1.0, -0.4),
        (1.2, 0.3),
        (0.6, 0.8),
        (0.1, 0.4),
    ])
    .unwrap();

    c.bench_function("footprint_contains", |b| {
        b.iter(|| fp.contains(black_box(0.5), black_box(0.1)))
    });
}

criterion_group!(
    benches,
    bench_comoving_distance,
    bench_clamped_interpolation,
    bench_footprint_contains
);
criterion_main!(benches);
