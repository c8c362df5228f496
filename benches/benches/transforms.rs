//! Benchmarks for prediction reversal and demosaicing
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dng_core::{ActiveArea, Plane};
use dng_transform::{reconstruct, BayerBilinear, Demosaic, Grayscale, LosslessPredictor};

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("Prediction Reversal");

    for size in [64usize, 256] {
        let differences: Vec<i32> = (0..size * size).map(|i| (i % 17) as i32 - 8).collect();
        let plane = Plane::from_vec(size, size, differences).unwrap();

        for predictor in [LosslessPredictor::Left, LosslessPredictor::Gradient, LosslessPredictor::Average] {
            group.bench_with_input(
                BenchmarkId::new(format!("predictor_{}", predictor.selection()), size),
                &plane,
                |b, plane| b.iter(|| reconstruct(black_box(plane), predictor, 14, 0).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_demosaic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Demosaic");

    let size = 256usize;
    let samples: Vec<f32> = (0..size * size).map(|i| (i % 251) as f32 / 251.0).collect();
    let plane = Plane::from_vec(size, size, samples).unwrap();
    let bilinear = BayerBilinear::rggb(ActiveArea::full(size as u32, size as u32));

    group.bench_function("bilinear_256", |b| {
        b.iter(|| bilinear.demosaic(black_box(&plane), 0, 0).unwrap());
    });

    group.bench_function("grayscale_256", |b| {
        b.iter(|| Grayscale.demosaic(black_box(&plane), 0, 0).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_reconstruct, bench_demosaic);
criterion_main!(benches);
