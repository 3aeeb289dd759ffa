//! Benchmarks for tile-parallel operations across tile sizes and worker counts.
//! Run with: cargo bench -p tessera --bench concurrent

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera::{
    ConcurrentTileOp, ConvolutionOp, FilteredRescaling, GeometricTransformOp, Image, Interpolation,
    Kernel, RankOp, RescaleConfig, TileConfig, TileOp, WorkerPool,
};

fn noise_image(width: usize, height: usize, bands: usize) -> Image {
    let mut rng = StdRng::seed_from_u64(7);
    let samples = (0..width * height * bands)
        .map(|_| rng.random_range(0..=255u16))
        .collect();
    Image::from_samples(width, height, bands, 8, samples).unwrap()
}

fn bench_op<T: TileOp + Clone>(
    c: &mut Criterion,
    name: &str,
    op: T,
    src: &Image,
    pools: &[WorkerPool],
) {
    let mut group = c.benchmark_group(name);
    group.sample_size(20);

    let mut sequential = op.clone();
    group.bench_function("sequential", |b| {
        b.iter(|| sequential.filter(black_box(src), None).unwrap())
    });

    for pool in pools {
        for tile in [64, 256] {
            let tiles = TileConfig::square(tile).unwrap();
            let mut concurrent = ConcurrentTileOp::new(op.clone(), tiles, pool).unwrap();
            let id = BenchmarkId::new(format!("threads_{}", pool.size()), tile);
            group.bench_function(id, |b| {
                b.iter(|| concurrent.filter(black_box(src), None).unwrap())
            });
        }
    }
    group.finish();
}

fn concurrent_benchmarks(c: &mut Criterion) {
    let src = noise_image(1024, 1024, 3);
    let pools: Vec<_> = [1, 2, 4, 8]
        .into_iter()
        .map(|n| WorkerPool::with_threads(n).unwrap())
        .collect();

    bench_op(c, "median_3x3", RankOp::median(1), &src, &pools);
    bench_op(
        c,
        "mean_5x5",
        ConvolutionOp::new(Kernel::mean(5, 5).unwrap()),
        &src,
        &pools,
    );
    bench_op(
        c,
        "twirl_bicubic",
        GeometricTransformOp::twirl(0.5, 0.5, 1.5, Interpolation::Bicubic),
        &src,
        &pools,
    );
    bench_op(
        c,
        "rescale_half",
        FilteredRescaling::scaled(RescaleConfig::default(), 0.5, 0.5).unwrap(),
        &src,
        &pools,
    );

    for pool in pools {
        pool.shutdown();
    }
}

criterion_group!(benches, concurrent_benchmarks);
criterion_main!(benches);
