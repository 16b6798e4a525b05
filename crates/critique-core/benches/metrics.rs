//! Benchmarks for critique-core metric kernels
//!
//! Run with: cargo bench -p critique-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use critique_core::filters::{edge_density, gaussian_blur_5x5, laplacian_variance};
use critique_core::{Assessor, Raster};

/// Generate synthetic RGB test data with gradients and texture
fn generate_test_raster(width: u32, height: u32) -> Raster {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;
            let texture = if (x / 7 + y / 5) % 2 == 0 { 20.0 } else { 0.0 };
            data.push((40.0 + 180.0 * fx + texture) as u8);
            data.push((40.0 + 180.0 * fy + texture) as u8);
            data.push((40.0 + 90.0 * (fx + fy) + texture) as u8);
        }
    }
    Raster::from_rgb8(width, height, data).unwrap()
}

/// Benchmark the individual grayscale kernels
fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels");

    for size in [256, 512, 1024, 2048].iter() {
        let width = *size;
        let height = *size;
        let pixel_count = (width * height) as u64;
        let raster = generate_test_raster(width, height);
        let luma = raster.luma();

        group.throughput(Throughput::Elements(pixel_count));

        group.bench_with_input(
            BenchmarkId::new("laplacian_variance", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| laplacian_variance(black_box(&luma), w, h));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("gaussian_blur_5x5", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| gaussian_blur_5x5(black_box(&luma), w, h));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("edge_density", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| edge_density(black_box(&luma), w, h));
            },
        );
    }

    group.finish();
}

/// Benchmark the full assessment pipeline
fn bench_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess");
    let assessor = Assessor::with_defaults();

    for size in [512, 1024, 2048].iter() {
        let width = *size;
        let height = *size;
        let raster = generate_test_raster(width, height);

        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("full_report", format!("{}x{}", width, height)),
            &raster,
            |b, raster| {
                b.iter(|| assessor.assess(black_box(raster), "bench"));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_kernels, bench_assess);
criterion_main!(benches);
