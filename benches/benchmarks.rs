use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ohlcv_features::{
    config::FeatureConfig,
    indicators::{parabolic_sar, rsi, SarAcceleration},
    pipeline::FeaturePipeline,
    table::PriceTable,
    types::PriceRow,
};

fn synthetic_prices(n: usize) -> PriceTable {
    let start = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let rows = (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + (t / 11.0).sin() * 10.0 + (t / 37.0).cos() * 5.0 + t * 0.01;
            PriceRow::new(
                start + chrono::Duration::days(i as i64),
                close - 0.3,
                close + 1.2,
                close - 1.1,
                close,
                50_000.0 + ((i * 7919) % 10_000) as f64,
            )
        })
        .collect();
    PriceTable::new(rows).unwrap()
}

fn benchmark_pipeline(c: &mut Criterion) {
    let prices = synthetic_prices(5_000);
    let config = FeatureConfig::default();

    c.bench_function("pipeline_5000_rows_parallel", |b| {
        let pipeline = FeaturePipeline::standard(&config).unwrap();
        b.iter(|| pipeline.run(black_box(&prices)).unwrap());
    });

    c.bench_function("pipeline_5000_rows_sequential", |b| {
        let pipeline = FeaturePipeline::standard(&config).unwrap().with_parallel(false);
        b.iter(|| pipeline.run(black_box(&prices)).unwrap());
    });
}

fn benchmark_stateful_indicators(c: &mut Criterion) {
    let prices = synthetic_prices(5_000);
    let close: Vec<f64> = prices.rows().iter().map(|r| r.close).collect();
    let high: Vec<f64> = prices.rows().iter().map(|r| r.high).collect();
    let low: Vec<f64> = prices.rows().iter().map(|r| r.low).collect();
    let changes: Vec<f64> = close.windows(2).map(|w| w[0] - w[1]).collect();

    c.bench_function("parabolic_sar_5000", |b| {
        b.iter(|| {
            parabolic_sar(
                black_box(&high),
                black_box(&low),
                black_box(&close),
                5,
                SarAcceleration::default(),
            )
            .unwrap()
        });
    });

    c.bench_function("wilder_rsi_5000", |b| {
        b.iter(|| rsi(black_box(&changes), 14).unwrap());
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_stateful_indicators);
criterion_main!(benches);
