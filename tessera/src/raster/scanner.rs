use super::Rect;

/// A sample location produced by [`RasterScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub col: usize,
    pub row: usize,
    pub band: usize,
}

/// Raster-order iterator over a rectangle.
///
/// Rows are the slowest axis, bands the fastest. With a single band the
/// scanner visits every pixel once with `band == 0`.
#[derive(Debug, Clone)]
pub struct RasterScanner {
    rect: Rect,
    bands: usize,
    index: usize,
    len: usize,
}

impl RasterScanner {
    /// Visits every pixel of `rect` once.
    pub fn pixels(rect: Rect) -> Self {
        Self::samples(rect, 1)
    }

    /// Visits every (pixel, band) pair of `rect`.
    pub fn samples(rect: Rect, bands: usize) -> Self {
        Self {
            rect,
            bands,
            index: 0,
            len: rect.area() * bands,
        }
    }
}

impl Iterator for RasterScanner {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        if self.index >= self.len {
            return None;
        }
        let band = self.index % self.bands;
        let pixel = self.index / self.bands;
        self.index += 1;
        Some(Location {
            col: self.rect.x + pixel % self.rect.width,
            row: self.rect.y + pixel / self.rect.width,
            band,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RasterScanner {}
