//! Single-pass feature extraction: histograms and extrema.

mod histogram;
mod min_max;


pub use histogram::Histogram;
pub use min_max::MinMax;

use crate::error::Result;
use crate::raster::{Image, Raster};

/// Histogram-equalizes `band` of `src`. Other bands are copied unchanged.
pub fn equalize(src: &Image, band: usize) -> Result<Image> {
    src.check_band(band)?;
    let table = Histogram::new(src, band)?.cdf_table();

    let mut dst = src.clone();
    let bands = dst.bands();
    for sample in dst.samples_mut().iter_mut().skip(band).step_by(bands) {
        *sample = table[*sample as usize];
    }
    Ok(dst)
}
