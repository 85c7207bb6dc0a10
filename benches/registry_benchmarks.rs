//! Criterion benchmarks for rust_logger_registry

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_logger_registry::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

fn populated(count: usize) -> (Arc<Hierarchy>, Arc<ManagementServer>, Registry) {
    let hierarchy = Arc::new(Hierarchy::new());
    for i in 0..count {
        hierarchy.logger(&format!("com.example.module{}.component{}", i % 20, i));
    }
    let server = Arc::new(ManagementServer::new());
    let registry = Registry::builder()
        .repository(hierarchy.clone())
        .exporter(server.clone())
        .scan_interval(Duration::from_secs(3600))
        .build()
        .expect("Failed to build registry");
    registry.start().expect("Failed to start registry");
    (hierarchy, server, registry)
}

// ============================================================================
// Reconciliation Benchmarks
// ============================================================================

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for count in [100, 1_000, 10_000] {
        let (_hierarchy, _server, registry) = populated(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("steady_state", count), &count, |b, _| {
            b.iter(|| black_box(registry.reconcile()));
        });
        registry.stop();
    }

    group.finish();
}

fn bench_reconcile_with_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_churn");
    group.throughput(Throughput::Elements(1));

    let (hierarchy, _server, registry) = populated(1_000);
    let mut round = 0_u64;
    group.bench_function("add_and_retire_one", |b| {
        b.iter(|| {
            let name = format!("churn.logger{}", round);
            hierarchy.logger(&name);
            registry.reconcile();
            hierarchy.remove(&name);
            round += 1;
        });
    });
    registry.stop();

    group.finish();
}

// ============================================================================
// Management Surface Benchmarks
// ============================================================================

fn bench_attribute_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("attributes");
    group.throughput(Throughput::Elements(1));

    let (_hierarchy, server, registry) = populated(1_000);
    let name = registry
        .object_name_for("com.example.module3.component3")
        .expect("Failed to build object name");

    group.bench_function("get_effective_level", |b| {
        b.iter(|| black_box(server.get_attribute(&name, "effectiveLevel")));
    });

    group.bench_function("set_level", |b| {
        b.iter(|| server.set_attribute(&name, "level", black_box(Value::from("INFO"))));
    });

    group.bench_function("logger_names", |b| {
        b.iter(|| black_box(registry.logger_names()));
    });

    registry.stop();
    group.finish();
}

fn bench_level_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_parse");

    group.bench_function("settable", |b| {
        b.iter(|| LevelSetting::parse(black_box("WARN")));
    });

    group.bench_function("rejected", |b| {
        b.iter(|| LevelSetting::parse(black_box("OFF")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reconcile,
    bench_reconcile_with_churn,
    bench_attribute_access,
    bench_level_parse
);
criterion_main!(benches);
