use std::cell::OnceCell;

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterScanner};

use super::MinMax;

/// Occurrence counts of every representable value of one band.
///
/// The extrema over the bin counts are computed on first use and cached.
/// The cache is a plain [`OnceCell`], so a histogram is not `Sync`.
#[derive(Debug, Clone)]
pub struct Histogram {
    band: usize,
    max_value: u16,
    counts: Vec<u64>,
    total: u64,
    extrema: OnceCell<MinMax>,
}

impl Histogram {
    /// Counts the samples of `band` in one pass over `raster`.
    pub fn new<R: Raster + ?Sized>(raster: &R, band: usize) -> Result<Self> {
        if band >= raster.bands() {
            return Err(Error::BandOutOfRange {
                band,
                bands: raster.bands(),
            });
        }

        let max_value = raster.max_value(band);
        let mut counts = vec![0u64; max_value as usize + 1];
        for loc in RasterScanner::pixels(raster.bounds()) {
            counts[raster.sample(loc.col, loc.row, band) as usize] += 1;
        }

        Ok(Self {
            band,
            max_value,
            counts,
            total: (raster.width() * raster.height()) as u64,
            extrema: OnceCell::new(),
        })
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins, `max_value + 1`.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, value: usize) -> u64 {
        self.counts[value]
    }

    pub fn total_samples(&self) -> u64 {
        self.total
    }

    /// Counts divided by the total sample count.
    pub fn normalized(&self) -> Vec<f64> {
        let total = self.total as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// Cumulative distribution function.
    pub fn cdf(&self) -> Vec<f64> {
        let mut cdf = self.normalized();
        for i in 1..cdf.len() {
            cdf[i] += cdf[i - 1];
        }
        cdf
    }

    /// Equalization lookup table, `round(cdf[i] × max_value)`.
    pub fn cdf_table(&self) -> Vec<u16> {
        let max = self.max_value as f64;
        self.cdf()
            .into_iter()
            .map(|c| (c * max).round().clamp(0.0, max) as u16)
            .collect()
    }

    pub fn extrema(&self) -> &MinMax {
        self.extrema.get_or_init(|| {
            let mut mm = MinMax::new(1);
            for &count in &self.counts {
                mm.include(count as f64);
            }
            mm
        })
    }

    /// Smallest bin count.
    pub fn min_count(&self) -> u64 {
        self.extrema().min() as u64
    }

    /// Largest bin count.
    pub fn max_count(&self) -> u64 {
        self.extrema().max() as u64
    }
}
