//! Locator benchmarks
//!
//! Run with: cargo bench --bench locator_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use epicenter::{GeoRegion, Locator, LocatorConfig, Point, SyntheticScenario, Triangulator};

fn california() -> GeoRegion {
    GeoRegion::new(32.0, 42.0, -125.0, -114.0)
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    let locator = Locator::new();

    for n in [25usize, 100, 500, 2000].iter() {
        let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), *n)
            .with_seed(*n as u64)
            .generate();

        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("divide_and_conquer", n), n, |b, _| {
            b.iter(|| locator.locate(black_box(&stations), black_box(&california())))
        });
    }

    group.finish();
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("base_case_threshold");
    let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 1000)
        .with_seed(7)
        .generate();

    for threshold in [4usize, 8, 32, 128].iter() {
        let locator = Locator::with_config(LocatorConfig {
            base_case_threshold: *threshold,
            ..LocatorConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("threshold", threshold), threshold, |b, _| {
            b.iter(|| locator.locate(black_box(&stations), black_box(&california())))
        });
    }

    group.finish();
}

fn bench_triangulation(c: &mut Criterion) {
    let stations = SyntheticScenario::new(Point::new(35.0, -120.0), california(), 8)
        .with_seed(3)
        .generate();
    let triangulator = Triangulator::default();

    c.bench_function("base_case_8_stations", |b| {
        b.iter(|| triangulator.estimate(black_box(&stations)))
    });
}

criterion_group!(benches, bench_locate, bench_threshold, bench_triangulation);
criterion_main!(benches);
