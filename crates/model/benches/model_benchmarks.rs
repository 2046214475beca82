//! Benchmarks for segovia-model regression and neutralization.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use polars::prelude::*;
use rand::Rng;
use segovia_model::{NeutralizeConfig, Neutralizer, Regressor};
use segovia_primitives::{Date, Panel, Symbol};

fn random_panel(n_dates: usize, n_symbols: usize, n_factors: usize) -> Panel {
    let mut rng = rand::thread_rng();
    let rows = n_dates * n_symbols;
    let mut dates = Vec::with_capacity(rows);
    let mut symbols = Vec::with_capacity(rows);
    for d in 0..n_dates {
        let date = Date::from_ymd_opt(2015 + (d / 12) as i32, (d % 12) as u32 + 1, 1).unwrap();
        for s in 0..n_symbols {
            dates.push(date);
            symbols.push(Symbol::new(format!("S{s:05}")));
        }
    }
    let mut builder =
        Panel::builder(dates, symbols).ret((0..rows).map(|_| rng.r#gen::<f64>() * 0.1 - 0.05).collect());
    for k in 0..n_factors {
        let values = (0..rows).map(|_| rng.r#gen::<f64>() * 2.0 - 1.0).collect();
        builder = builder.factor(format!("M{k:03}"), values);
    }
    builder.build().unwrap()
}

/// One cross-section with `n_industries` dummy columns and `n_targets` factors.
fn random_cross_section(n_symbols: usize, n_industries: usize, n_targets: usize) -> DataFrame {
    let mut rng = rand::thread_rng();
    let industry: Vec<usize> = (0..n_symbols).map(|_| rng.gen_range(0..n_industries)).collect();
    let mut columns = Vec::new();
    for k in 0..n_industries {
        let dummy: Vec<f64> = industry.iter().map(|&i| f64::from(u8::from(i == k))).collect();
        columns.push(Column::new(format!("ind{k:02}").into(), dummy));
    }
    for k in 0..n_targets {
        let values: Vec<f64> = (0..n_symbols).map(|_| rng.r#gen::<f64>()).collect();
        columns.push(Column::new(format!("M{k:03}").into(), values));
    }
    DataFrame::new(columns).unwrap()
}

fn bench_regress(c: &mut Criterion) {
    let mut group = c.benchmark_group("common_regress");
    group.sample_size(20);

    for (n_symbols, name) in [(300, "small_universe"), (1000, "medium_universe"), (3000, "large_universe")] {
        let panel = random_panel(24, n_symbols, 8);
        group.throughput(Throughput::Elements(panel.len() as u64));
        group.bench_with_input(BenchmarkId::new("scenario", name), &panel, |b, panel| {
            let regressor = Regressor::new();
            b.iter(|| regressor.regress(black_box(panel)).unwrap());
        });
    }
    group.finish();
}

fn bench_neutralize(c: &mut Criterion) {
    let mut group = c.benchmark_group("neutralize");
    group.sample_size(20);

    let explanatory: Vec<String> = (0..28).map(|k| format!("ind{k:02}")).collect();
    for workers in [1, 6] {
        let df = random_cross_section(3000, 28, 40);
        let neutralizer = Neutralizer::with_config(NeutralizeConfig {
            explanatory: explanatory.clone(),
            max_workers: workers,
        })
        .unwrap();
        group.throughput(Throughput::Elements(40));
        group.bench_with_input(BenchmarkId::new("workers", workers), &df, |b, df| {
            b.iter(|| neutralizer.neutralize(black_box(df)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_regress, bench_neutralize);
criterion_main!(benches);
