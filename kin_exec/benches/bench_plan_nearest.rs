//! # Nearest Primitive Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kin_lib::plan::{Line, Plan};
use nalgebra::Point2;

fn plan_nearest_benchmark(c: &mut Criterion) {
    // ---- Build the plans ----

    // 2001 passes 3 m apart either side of a diagonal AB line
    let reference = Line::new(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0));
    let ordered = Plan::parallel_lines(&reference, 3.0, -1000..=1000);

    // Same primitives without the ordering guarantee, so every one is visited
    let mixed = Plan::from_primitives(ordered.primitives().to_vec());

    // Tow point near the middle of the field
    let point = Point2::new(250.0, 180.0);

    // ---- Run benchmarks ----

    c.bench_function("nearest_primitive_only_lines", |b| {
        b.iter(|| ordered.nearest_primitive(black_box(&point)))
    });

    c.bench_function("nearest_primitive_mixed", |b| {
        b.iter(|| mixed.nearest_primitive(black_box(&point)))
    });
}

criterion_group!(benches, plan_nearest_benchmark);
criterion_main!(benches);
