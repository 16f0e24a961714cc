use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taxifare::config::TrainConfig;
use taxifare::dataset::{columns, RideFrame, RideRecord};
use taxifare::features::feature_pipeline;
use taxifare::preprocessing::{FittedTransformer, Transformer, DEFAULT_TIMEZONE};
use taxifare::{CpuBackend, Trainer};

/// Deterministic synthetic rides spread over hours, weekdays, months and years.
fn synthetic_rides(n: usize) -> Vec<RideRecord> {
    (0..n)
        .map(|i| {
            let year = 2009 + i % 7;
            let month = 1 + i % 12;
            let day = 1 + i % 28;
            let hour = i % 24;
            let offset = (i % 50) as f64 * 0.002;
            RideRecord {
                key: None,
                fare_amount: Some(3.0 + offset * 400.0),
                pickup_datetime: Some(format!(
                    "{year}-{month:02}-{day:02} {hour:02}:17:00 UTC"
                )),
                pickup_longitude: Some(-73.99),
                pickup_latitude: Some(40.73),
                dropoff_longitude: Some(-73.99 + offset),
                dropoff_latitude: Some(40.73 + offset),
                passenger_count: Some(1 + (i % 4) as i64),
            }
        })
        .collect()
}

fn frame(n: usize) -> (RideFrame, Vec<f64>) {
    RideFrame::from_records(&synthetic_rides(n))
        .split_target(columns::FARE_AMOUNT)
        .expect("synthetic rides carry a fare column")
}

fn bench_feature_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_fit");
    for n in [100, 1_000, 10_000] {
        let (x, _) = frame(n);
        let pipeline = feature_pipeline::<CpuBackend>(DEFAULT_TIMEZONE);
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| black_box(pipeline.fit(black_box(x)).expect("fit")));
        });
    }
    group.finish();
}

fn bench_feature_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_transform");
    for n in [100, 1_000, 10_000] {
        let (x, _) = frame(n);
        let fitted = feature_pipeline::<CpuBackend>(DEFAULT_TIMEZONE)
            .fit(&x)
            .expect("fit");
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| black_box(fitted.transform(black_box(x)).expect("transform")));
        });
    }
    group.finish();
}

fn bench_trainer_run(c: &mut Criterion) {
    let (x, y) = frame(1_000);
    let mut trainer: Trainer =
        Trainer::new(x, y, TrainConfig::default()).expect("valid trainer inputs");

    c.bench_function("trainer_run_1000", |b| {
        b.iter(|| {
            trainer.set_pipeline();
            black_box(trainer.run().expect("run"))
        });
    });
}

criterion_group!(
    benches,
    bench_feature_fit,
    bench_feature_transform,
    bench_trainer_run
);
criterion_main!(benches);
