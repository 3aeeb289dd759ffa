use crate::error::{Error, Result};
use crate::mapper::scaled_len;
use crate::raster::{Image, Raster};

/// Source index for every destination index, by integer error accumulation.
///
/// Equivalent to `floor(i × src_len / dst_len)` without any division in the
/// loop.
pub fn bresenham_steps(src_len: usize, dst_len: usize) -> Vec<usize> {
    let (step, rest) = (src_len / dst_len, src_len % dst_len);
    let mut steps = Vec::with_capacity(dst_len);
    let (mut index, mut error) = (0, 0);
    for _ in 0..dst_len {
        steps.push(index);
        index += step;
        error += rest;
        if error >= dst_len {
            error -= dst_len;
            index += 1;
        }
    }
    steps
}

/// Nearest-neighbour rescale of `src` into the size of `dst`.
///
/// Integer arithmetic only; meant for fast previews.
pub fn bresenham(src: &Image, mut dst: Image) -> Result<Image> {
    if src.bands() != dst.bands() {
        return Err(Error::DimensionMismatch {
            expected: src.dimensions(),
            actual: dst.dimensions(),
        });
    }
    if src.depths() != dst.depths() {
        return Err(Error::DepthMismatch {
            expected: src.depths().to_vec(),
            actual: dst.depths().to_vec(),
        });
    }

    let cols = bresenham_steps(src.width(), dst.width());
    let rows = bresenham_steps(src.height(), dst.height());
    let bands = src.bands();
    let row_len = dst.width() * bands;

    for (dst_row, &src_row) in dst.samples_mut().chunks_exact_mut(row_len).zip(&rows) {
        for (pixel, &src_col) in dst_row.chunks_exact_mut(bands).zip(&cols) {
            pixel.copy_from_slice(src.pixel(src_col, src_row));
        }
    }
    Ok(dst)
}

/// [`bresenham`] into a new image of `round(W × xscale) × round(H × yscale)`.
pub fn bresenham_zoom(src: &Image, xscale: f64, yscale: f64) -> Result<Image> {
    let valid = |s: f64| s.is_finite() && s > 0.0;
    if !valid(xscale) || !valid(yscale) {
        return Err(Error::InvalidScale {
            x: xscale,
            y: yscale,
        });
    }
    let dst = src.compatible(
        scaled_len(src.width(), xscale)?,
        scaled_len(src.height(), yscale)?,
    )?;
    bresenham(src, dst)
}
