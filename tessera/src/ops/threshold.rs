use crate::error::{Error, Result};
use crate::features::Histogram;
use crate::raster::{Image, ImageDimensions, Raster, RasterScanner, TileWriter};
use crate::tiler::Tile;

use super::TileOp;

/// Cumulative shares within this distance of the target count as reached.
const SHARE_TOLERANCE: f64 = 1e-9;

/// Automatic threshold selection from a band's histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdMethod {
    /// Floor of the mean sample value.
    Mean,
    /// Tsai's moment-preserving threshold.
    Moments,
    /// Otsu's maximum between-class variance.
    Otsu,
}

impl ThresholdMethod {
    pub const ALL: [ThresholdMethod; 3] = [
        ThresholdMethod::Mean,
        ThresholdMethod::Moments,
        ThresholdMethod::Otsu,
    ];

    pub fn compute(&self, histogram: &Histogram) -> u16 {
        match self {
            ThresholdMethod::Mean => mean(histogram),
            ThresholdMethod::Moments => moments(histogram).unwrap_or_else(|| mean(histogram)),
            ThresholdMethod::Otsu => otsu(histogram),
        }
    }
}

fn mean(histogram: &Histogram) -> u16 {
    let sum: f64 = histogram
        .counts()
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();
    (sum / histogram.total_samples() as f64).floor() as u16
}

/// `None` when the moment equations have no solution, e.g. for a constant band.
fn moments(histogram: &Histogram) -> Option<u16> {
    let shares = histogram.normalized();
    let (mut m1, mut m2, mut m3) = (0.0, 0.0, 0.0);
    for (value, &p) in shares.iter().enumerate() {
        let v = value as f64;
        m1 += v * p;
        m2 += v * v * p;
        m3 += v * v * v * p;
    }

    let cd = m2 - m1 * m1;
    let c0 = (m1 * m3 - m2 * m2) / cd;
    let c1 = (m2 * m1 - m3) / cd;
    let z = (c1 * c1 - 4.0 * c0).sqrt();
    let (z0, z1) = (0.5 * (-c1 - z), 0.5 * (-c1 + z));
    let p0 = (z1 - m1) / (z1 - z0);
    if !p0.is_finite() {
        return None;
    }

    let mut cumulative = 0.0;
    for (value, &p) in shares.iter().enumerate() {
        cumulative += p;
        if cumulative >= p0 - SHARE_TOLERANCE {
            return Some(value as u16);
        }
    }
    None
}

fn otsu(histogram: &Histogram) -> u16 {
    let counts = histogram.counts();
    let total = histogram.total_samples() as f64;
    let sum: f64 = counts
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let (mut threshold, mut best) = (0, 0.0);
    let (mut weight_b, mut sum_b) = (0.0, 0.0);
    for (value, &count) in counts.iter().enumerate() {
        weight_b += count as f64;
        sum_b += value as f64 * count as f64;
        let weight_f = total - weight_b;
        if weight_b == 0.0 || weight_f == 0.0 {
            continue;
        }
        let diff = sum_b / weight_b - (sum - sum_b) / weight_f;
        let variance = weight_b * weight_f * diff * diff;
        if variance > best {
            best = variance;
            threshold = value;
        }
    }
    threshold as u16
}

/// Binarizes one band: samples above `threshold` become 0, all others the
/// destination's maximum (1 in the default one-bit destination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalThresholdOp {
    pub band: usize,
    pub threshold: u16,
}

impl Default for GlobalThresholdOp {
    fn default() -> Self {
        Self {
            band: 0,
            threshold: 127,
        }
    }
}

impl GlobalThresholdOp {
    pub fn new(band: usize, threshold: u16) -> Self {
        Self { band, threshold }
    }

    /// Threshold chosen by `method` from the histogram of `band` of `src`.
    pub fn auto(src: &Image, band: usize, method: ThresholdMethod) -> Result<Self> {
        let histogram = Histogram::new(src, band)?;
        let threshold = method.compute(&histogram);
        tracing::debug!(band, threshold, ?method, "Computed global threshold");
        Ok(Self::new(band, threshold))
    }
}

impl TileOp for GlobalThresholdOp {
    fn dest_for(&self, src: &Image) -> Result<Image> {
        src.check_band(self.band)?;
        Image::new(src.width(), src.height(), 1, 1)
    }

    fn validate_destination(&self, src: &Image, dst: &Image) -> Result<()> {
        src.check_band(self.band)?;
        let expected = ImageDimensions {
            width: src.width(),
            height: src.height(),
            bands: 1,
        };
        if dst.dimensions() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: dst.dimensions(),
            });
        }
        Ok(())
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        let background = out.max_value(0);
        for loc in RasterScanner::pixels(tile.writable_absolute()) {
            let value = if src.sample(loc.col, loc.row, self.band) > self.threshold {
                0
            } else {
                background
            };
            out.set_sample(loc.col, loc.row, 0, value);
        }
        Ok(())
    }
}
