//! Softmax performance benchmarks across axes and tensor sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softforge::{Softmax, Tensor};

fn bench_last_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("softmax_last_axis");

    for (name, dims) in [
        ("small", &[32usize, 128][..]),
        ("medium", &[256, 512][..]),
        ("large", &[1024, 1024][..]),
    ] {
        let input = Tensor::random_seeded(dims, 42);
        group.bench_with_input(BenchmarkId::new(name, name), &input, |b, input| {
            let softmax = Softmax::new();
            b.iter(|| black_box(softmax.evaluate(input, -1).unwrap()));
        });
    }

    group.finish();
}

fn bench_strided_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("softmax_strided_axis");

    for (name, dims, axis) in [
        ("rank3_axis0", &[64usize, 64, 64][..], 0isize),
        ("rank3_axis1", &[64, 64, 64][..], 1),
        ("rank4_axis1", &[8, 32, 32, 32][..], 1),
    ] {
        let input = Tensor::random_seeded(dims, 7);
        group.bench_with_input(BenchmarkId::new(name, name), &input, |b, input| {
            let softmax = Softmax::new();
            b.iter(|| black_box(softmax.evaluate(input, axis).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_last_axis, bench_strided_axis);
criterion_main!(benches);
