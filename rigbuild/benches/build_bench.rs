use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rigbuild::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bench_build(c: &mut Criterion) {
    let selector = Selector::new(Arc::new(Catalog::builtin().unwrap())).unwrap();

    c.bench_function("build_gaming_1500", |b| {
        b.iter(|| selector.build(black_box(1500.0), black_box("gaming")))
    });

    // Low budgets force the downgrade pass.
    let minimum = selector.minimum_budget().unwrap();
    c.bench_function("build_near_minimum", |b| {
        b.iter(|| selector.build(black_box(minimum + 25.0), black_box("design")))
    });
}

fn bench_load_catalog(c: &mut Criterion) {
    c.bench_function("load_builtin_catalog", |b| b.iter(Catalog::builtin));

    c.bench_function("load_fixture_catalog", |b| {
        b.iter(|| Catalog::load(black_box(&fixture_path("two_socket_catalog.json"))))
    });
}

criterion_group!(benches, bench_build, bench_load_catalog);
criterion_main!(benches);
