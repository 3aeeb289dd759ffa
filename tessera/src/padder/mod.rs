//! Image padding: extends a finite raster to all integer coordinates.
//!
//! A [`Padder`] is total over `i64 × i64`, so filters sampling near the
//! border never need bounds checks.
//!
//! | Variant          | Outside `[0, W) × [0, H)`                          |
//! |------------------|----------------------------------------------------|
//! | `Zero`           | 0                                                  |
//! | `ExtendedBorder` | nearest valid index, clamped per axis              |
//! | `Tiled`          | circular indexing, `((c % W) + W) % W`             |
//! | `Reflective`     | mirror indexing, edge sample repeated              |

#[cfg(test)]
mod tests;

use crate::raster::Raster;

/// Border extension strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Padder {
    /// Zero outside the image.
    Zero,
    /// Repeats the outermost row/column.
    #[default]
    ExtendedBorder,
    /// Wraps around, as if the image tiled the plane.
    Tiled,
    /// Mirrors the image at its borders.
    Reflective,
}

/// Clamps `i` to `[0, len)`.
#[inline]
pub fn clamp_index(i: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    i.clamp(0, len as i64 - 1) as usize
}

/// Circular index: `((i % len) + len) % len`.
#[inline]
pub fn wrap_index(i: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    i.rem_euclid(len as i64) as usize
}

/// Mirror index with the edge sample repeated (`… 1 0 | 0 1 … W-1 | W-1 W-2 …`).
///
/// Negative indices are first reflected to `-1 - i`; the folded index then
/// alternates between forward and backward runs of length `len`.
#[inline]
pub fn reflect_index(i: i64, len: usize) -> usize {
    debug_assert!(len > 0);
    let i = if i < 0 { -1 - i } else { i };
    let folded = wrap_index(i, len);
    if (i / len as i64) % 2 == 0 {
        folded
    } else {
        len - 1 - folded
    }
}

impl Padder {
    pub const ALL: [Padder; 4] = [
        Padder::Zero,
        Padder::ExtendedBorder,
        Padder::Tiled,
        Padder::Reflective,
    ];

    /// Maps (col, row) into the raster, or `None` where the padder yields zero.
    #[inline]
    pub fn resolve(
        &self,
        width: usize,
        height: usize,
        col: i64,
        row: i64,
    ) -> Option<(usize, usize)> {
        match self {
            Padder::Zero => {
                if col < 0 || row < 0 || col >= width as i64 || row >= height as i64 {
                    None
                } else {
                    Some((col as usize, row as usize))
                }
            }
            Padder::ExtendedBorder => Some((clamp_index(col, width), clamp_index(row, height))),
            Padder::Tiled => Some((wrap_index(col, width), wrap_index(row, height))),
            Padder::Reflective => Some((reflect_index(col, width), reflect_index(row, height))),
        }
    }

    /// Sample of `band` at any integer coordinate.
    #[inline]
    pub fn sample<R: Raster + ?Sized>(&self, raster: &R, col: i64, row: i64, band: usize) -> u16 {
        match self.resolve(raster.width(), raster.height(), col, row) {
            Some((x, y)) => raster.sample(x, y, band),
            None => 0,
        }
    }

    /// Sample as `f64`, the form interpolation works in.
    #[inline]
    pub fn sample_f64<R: Raster + ?Sized>(
        &self,
        raster: &R,
        col: i64,
        row: i64,
        band: usize,
    ) -> f64 {
        self.sample(raster, col, row, band) as f64
    }

    /// All bands of the pixel at any integer coordinate, written into `out`.
    pub fn pixel_into<R: Raster + ?Sized>(
        &self,
        raster: &R,
        col: i64,
        row: i64,
        out: &mut [u16],
    ) {
        match self.resolve(raster.width(), raster.height(), col, row) {
            Some((x, y)) => raster.pixel_into(x, y, out),
            None => out.iter_mut().take(raster.bands()).for_each(|v| *v = 0),
        }
    }

    /// All bands of the pixel at any integer coordinate.
    pub fn pixel<R: Raster + ?Sized>(&self, raster: &R, col: i64, row: i64) -> Vec<u16> {
        let mut out = vec![0; raster.bands()];
        self.pixel_into(raster, col, row, &mut out);
        out
    }
}
