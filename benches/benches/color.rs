//! Benchmarks for calibration math and color conversion

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dng_color::{daylight_xyz, Filter, Matrix, XyzD50ToSrgb};
use dng_core::{ColorSpace, RgbRect};

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("Matrix");

    let m = Matrix::from_rows(&[
        [0.6722, -0.0635, -0.0963],
        [-0.4287, 1.2460, 0.2028],
        [-0.0908, 0.2162, 0.5668],
    ])
    .unwrap();

    group.bench_function("inverse_3x3", |b| {
        b.iter(|| black_box(&m).inverse().unwrap());
    });

    group.bench_function("multiply_3x3", |b| {
        b.iter(|| black_box(&m).multiply(black_box(&m)).unwrap());
    });

    group.bench_function("daylight_xyz", |b| {
        b.iter(|| daylight_xyz(black_box(6504.0), 1.0));
    });

    group.finish();
}

fn bench_srgb(c: &mut Criterion) {
    let mut group = c.benchmark_group("sRGB");

    let size = 256usize;
    let data: Vec<f32> = (0..size * size * 3).map(|i| (i % 97) as f32 / 97.0).collect();
    let rect = RgbRect::from_vec(size, size, ColorSpace::XyzD50, data).unwrap();

    group.bench_function("xyz_d50_to_srgb_256", |b| {
        b.iter(|| XyzD50ToSrgb.apply(black_box(&rect)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_matrix, bench_srgb);
criterion_main!(benches);
