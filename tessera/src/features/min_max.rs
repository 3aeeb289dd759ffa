use crate::raster::{Raster, RasterScanner};

/// Running per-band and global extrema.
///
/// Starts at `+∞`/`−∞`, so the first inclusion always takes effect.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMax {
    minima: Vec<f64>,
    maxima: Vec<f64>,
    min: f64,
    max: f64,
}

impl MinMax {
    pub fn new(bands: usize) -> Self {
        Self {
            minima: vec![f64::INFINITY; bands],
            maxima: vec![f64::NEG_INFINITY; bands],
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Extrema of every sample of every band of `raster`.
    pub fn for_raster<R: Raster + ?Sized>(raster: &R) -> Self {
        let mut mm = Self::new(raster.bands());
        for loc in RasterScanner::samples(raster.bounds(), raster.bands()) {
            mm.include_band(raster.sample(loc.col, loc.row, loc.band) as f64, loc.band);
        }
        mm
    }

    /// Includes `value` in band 0.
    #[inline]
    pub fn include(&mut self, value: f64) {
        self.include_band(value, 0);
    }

    #[inline]
    pub fn include_band(&mut self, value: f64, band: usize) {
        self.minima[band] = self.minima[band].min(value);
        self.maxima[band] = self.maxima[band].max(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn bands(&self) -> usize {
        self.minima.len()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn band_min(&self, band: usize) -> f64 {
        self.minima[band]
    }

    pub fn band_max(&self, band: usize) -> f64 {
        self.maxima[band]
    }

    /// Whether nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}
