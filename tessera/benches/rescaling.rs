//! Benchmarks for filtered rescaling and contribution table construction.
//! Run with: cargo bench -p tessera --bench rescaling

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera::{
    bresenham_zoom, ContributionTable, FilteredRescaling, Image, Raster, ResamplingFilter,
};

fn noise_image(width: usize, height: usize, bands: usize) -> Image {
    let mut rng = StdRng::seed_from_u64(42);
    let samples = (0..width * height * bands)
        .map(|_| rng.random_range(0..=255u16))
        .collect();
    Image::from_samples(width, height, bands, 8, samples).unwrap()
}

fn benchmark_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("contribution_table");
    for filter in ResamplingFilter::ALL {
        group.bench_function(BenchmarkId::new("4096_to_1000", format!("{filter:?}")), |b| {
            b.iter(|| ContributionTable::new(black_box(filter), 4096, 1000))
        });
    }
    group.finish();
}

fn benchmark_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoom");
    let src = noise_image(1024, 768, 3);
    group.throughput(Throughput::Elements((src.width() * src.height()) as u64));

    for (name, scale) in [("down_0.37", 0.37), ("up_1.8", 1.8)] {
        for filter in [ResamplingFilter::Box, ResamplingFilter::CatmullRom, ResamplingFilter::Lanczos3] {
            let mut rescaler = FilteredRescaling::with_filter(filter);
            group.bench_function(BenchmarkId::new(name, format!("{filter:?}")), |b| {
                b.iter(|| rescaler.zoom(black_box(&src), scale, scale).unwrap())
            });
        }
        group.bench_function(BenchmarkId::new(name, "bresenham"), |b| {
            b.iter(|| bresenham_zoom(black_box(&src), scale, scale).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_tables, benchmark_zoom);
criterion_main!(benches);
