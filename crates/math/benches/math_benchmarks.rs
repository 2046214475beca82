//! Benchmarks for segovia-math kernels.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::{Array1, Array2};
use rand::Rng;
use segovia_math::{
    TieBreak, add_intercept, assign_groups, least_squares, rank, rolling_std, spearman,
};

fn random_array(n: usize) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    Array1::from_iter((0..n).map(|_| rng.r#gen::<f64>() * 0.1 - 0.05))
}

fn random_matrix(rows: usize, cols: usize) -> Array2<f64> {
    let mut rng = rand::thread_rng();
    Array2::from_shape_fn((rows, cols), |_| rng.r#gen::<f64>())
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in [100, 1000, 5000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let data = random_array(size);
            b.iter(|| rank(black_box(data.view()), false, TieBreak::First));
        });
    }

    group.finish();
}

fn bench_spearman(c: &mut Criterion) {
    let mut group = c.benchmark_group("spearman");

    for size in [100, 1000, 5000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let x = random_array(size);
            let y = random_array(size);
            b.iter(|| spearman(black_box(x.view()), black_box(y.view())));
        });
    }

    group.finish();
}

fn bench_assign_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_groups");

    for size in [100, 1000, 5000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let data = random_array(size);
            b.iter(|| assign_groups(black_box(data.view()), 5, false).unwrap());
        });
    }

    group.finish();
}

fn bench_rolling_std(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_std");

    for (len, window) in [(120, 12), (1000, 12), (1000, 60)] {
        group.bench_with_input(
            BenchmarkId::new("len_window", format!("{len}_{window}")),
            &(len, window),
            |b, &(len, window)| {
                let data = random_array(len);
                b.iter(|| rolling_std(black_box(data.view()), black_box(window)));
            },
        );
    }

    group.finish();
}

fn bench_least_squares(c: &mut Criterion) {
    let mut group = c.benchmark_group("least_squares");
    group.sample_size(50);

    for (n_assets, n_factors) in [(300, 5), (1000, 10), (3000, 30)] {
        group.throughput(Throughput::Elements((n_assets * n_factors) as u64));
        group.bench_with_input(
            BenchmarkId::new("assets_factors", format!("{n_assets}x{n_factors}")),
            &(n_assets, n_factors),
            |b, &(n_assets, n_factors)| {
                let y = random_array(n_assets);
                let x = add_intercept(random_matrix(n_assets, n_factors).view());
                b.iter(|| least_squares(black_box(y.view()), black_box(x.view())).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rank,
    bench_spearman,
    bench_assign_groups,
    bench_rolling_std,
    bench_least_squares,
);

criterion_main!(benches);
