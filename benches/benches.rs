//! Benchmarks for the nearest neighbor engines.

use nearby::euclid::Euclidean;
use nearby::{CoverTree, ExhaustiveSearch, KdTree, NearestNeighborIndex};

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

type Point = Euclidean<[f64; 2]>;

/// A deterministic spiral of points, all within `[-1, 1]^2`.
fn spiral() -> Vec<Point> {
    let size = 1000;
    let turns = 10.0;

    (0..size)
        .map(|i| {
            let r = (i as f64) / (size as f64);
            let theta = turns * r * std::f64::consts::PI;
            Euclidean([r * theta.cos(), r * theta.sin()])
        })
        .collect()
}

fn kd_tree(points: &[Point]) -> KdTree<Point> {
    let mut tree = KdTree::with_extent(&Euclidean([-2.0, -2.0]), &Euclidean([2.0, 2.0])).unwrap();
    for p in points {
        tree.push(*p).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let points = black_box(spiral());

    let mut group = c.benchmark_group("insert");

    group.bench_function("CoverTree", |b| {
        b.iter_batched(
            || points.clone(),
            |points| points.into_iter().collect::<CoverTree<_>>(),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("KdTree", |b| {
        b.iter_batched(
            || points.clone(),
            |points| kd_tree(&points),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_knn(c: &mut Criterion) {
    let points = black_box(spiral());
    let target = black_box(Euclidean([0.25, -0.25]));

    let cover: CoverTree<_> = points.iter().copied().collect();
    let kd = kd_tree(&points);
    let brute: ExhaustiveSearch<_> = points.iter().copied().collect();

    let mut group = c.benchmark_group("knn");
    group.bench_function("CoverTree", |b| b.iter(|| cover.knn(&target, 10)));
    group.bench_function("KdTree", |b| b.iter(|| kd.knn(&target, 10)));
    group.bench_function("ExhaustiveSearch", |b| b.iter(|| brute.knn(&target, 10)));
    group.finish();
}

criterion_group!(benches, bench_insert, bench_knn);
criterion_main!(benches);
