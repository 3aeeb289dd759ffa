//! Runs a small processing pipeline on a synthetic image.
//!
//! Run with: cargo run -p tessera --example pipeline

use common::{setup_logging, LogConfig};
use tessera::{
    equalize, ConcurrentTileOp, ConvolutionOp, FilteredRescaling, GeometricTransformOp,
    GlobalThresholdOp, Histogram, Image, Interpolation, Kernel, MinMax, PoolConfig, RankOp, Raster,
    ResamplingFilter, ThresholdMethod, TileConfig, TileOp, WorkerPool,
};

fn synthetic(width: usize, height: usize) -> anyhow::Result<Image> {
    let mut image = Image::new(width, height, 1, 12)?;
    for y in 0..height {
        for x in 0..width {
            let ring = ((x as f64 - width as f64 / 2.0).hypot(y as f64 - height as f64 / 2.0) / 8.0)
                .sin()
                .abs();
            image.set_sample(x, y, 0, (ring * 2000.0) as u16);
        }
    }
    Ok(image)
}

fn main() -> anyhow::Result<()> {
    setup_logging(&LogConfig::console("info"))?;

    let pool = WorkerPool::new(PoolConfig::default())?;
    let tiles = TileConfig::square(128)?;
    let src = synthetic(640, 480)?;

    let mut median = ConcurrentTileOp::new(RankOp::median(2), tiles, &pool)?;
    let denoised = median.filter(&src, None)?;

    let gaussian = ConvolutionOp::separable(
        Kernel::row(vec![0.25, 0.5, 0.25])?,
        Kernel::column(vec![0.25, 0.5, 0.25])?,
    )?;
    let mut blur = ConcurrentTileOp::new(gaussian, tiles, &pool)?;
    let smoothed = blur.filter(&denoised, None)?;

    let twirl = GeometricTransformOp::twirl(0.5, 0.5, 2.5, Interpolation::Bicubic);
    let mut twirl = ConcurrentTileOp::new(twirl, tiles, &pool)?;
    let twirled = twirl.filter(&smoothed, None)?;

    let mut rescaler = FilteredRescaling::with_filter(ResamplingFilter::Lanczos3);
    let thumbnail = rescaler.zoom(&twirled, 0.25, 0.25)?;
    let equalized = equalize(&thumbnail, 0)?;

    let histogram = Histogram::new(&equalized, 0)?;
    let range = MinMax::for_raster(&equalized);
    let mut threshold = GlobalThresholdOp::auto(&equalized, 0, ThresholdMethod::Otsu)?;
    let mask = threshold.filter(&equalized, None)?;
    let foreground = mask.samples().iter().filter(|&&v| v == 0).count();
    tracing::info!(
        width = equalized.width(),
        height = equalized.height(),
        min = range.min(),
        max = range.max(),
        busiest_bin_count = histogram.max_count(),
        foreground,
        "Pipeline finished"
    );

    pool.shutdown();
    Ok(())
}
