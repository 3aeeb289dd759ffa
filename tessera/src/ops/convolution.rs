use crate::error::{Error, Result};
use crate::padder::Padder;
use crate::raster::{clamp_sample, Image, Raster, RasterScanner, TileWriter};
use crate::tiler::{Tile, TileLayout};

use super::rescale::{band_map, LinearMap};
use super::TileOp;

/// Row-major convolution kernel with odd dimensions, centered on its middle
/// element.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Kernel {
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self> {
        let odd = |n: usize| n % 2 == 1;
        if !odd(width) || !odd(height) || values.len() != width * height {
            return Err(Error::InvalidKernel {
                width,
                height,
                len: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Horizontal `1 × n` kernel.
    pub fn row(values: Vec<f64>) -> Result<Self> {
        Self::new(values.len(), 1, values)
    }

    /// Vertical `n × 1` kernel.
    pub fn column(values: Vec<f64>) -> Result<Self> {
        Self::new(1, values.len(), values)
    }

    /// Mean filter of `width × height`.
    pub fn mean(width: usize, height: usize) -> Result<Self> {
        let weight = 1.0 / (width * height).max(1) as f64;
        Self::new(width, height, vec![weight; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn radius_x(&self) -> usize {
        self.width / 2
    }

    pub fn radius_y(&self) -> usize {
        self.height / 2
    }

    #[inline]
    pub fn get(&self, kx: usize, ky: usize) -> f64 {
        self.values[ky * self.width + kx]
    }

    fn is_row(&self) -> bool {
        self.height == 1
    }

    fn is_column(&self) -> bool {
        self.width == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Full(Kernel),
    /// Column pass first, then the row pass over its unquantized output.
    Separable { row: Kernel, column: Kernel },
}

/// Discrete 2D convolution, `Σ k(i, j) · src(c − i, r − j)`.
///
/// A separable kernel runs as two passes inside every tile. The row pass
/// reads the column pass's output through the same padder, so the result
/// does not depend on the tile size.
///
/// Each output sample is optionally made absolute, then passed through its
/// band's [`LinearMap`], then rounded half-up and clamped to the band range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionOp {
    shape: Shape,
    padder: Padder,
    abs: bool,
    maps: Vec<LinearMap>,
}

impl ConvolutionOp {
    pub fn new(kernel: Kernel) -> Self {
        Self::with_shape(Shape::Full(kernel))
    }

    /// Convolves with `column` first, then with `row`.
    pub fn separable(row: Kernel, column: Kernel) -> Result<Self> {
        for kernel in [&row, &column] {
            if !kernel.is_row() && !kernel.is_column() {
                return Err(Error::InvalidKernel {
                    width: kernel.width,
                    height: kernel.height,
                    len: kernel.values.len(),
                });
            }
        }
        // either orientation of a 1D kernel is accepted for both roles
        let row = Kernel {
            width: row.values.len(),
            height: 1,
            values: row.values,
        };
        let column = Kernel {
            width: 1,
            height: column.values.len(),
            values: column.values,
        };
        Ok(Self::with_shape(Shape::Separable { row, column }))
    }

    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            padder: Padder::ExtendedBorder,
            abs: false,
            maps: Vec::new(),
        }
    }

    pub fn with_padder(mut self, padder: Padder) -> Self {
        self.padder = padder;
        self
    }

    /// Takes the absolute value of every sum before mapping it.
    pub fn with_abs(mut self, abs: bool) -> Self {
        self.abs = abs;
        self
    }

    /// Per-band output mapping. Bands past the end reuse the last map.
    pub fn with_maps(mut self, maps: Vec<LinearMap>) -> Self {
        self.maps = maps;
        self
    }

    pub fn padder(&self) -> Padder {
        self.padder
    }

    pub fn is_separable(&self) -> bool {
        matches!(self.shape, Shape::Separable { .. })
    }

    fn radius(&self) -> (usize, usize) {
        match &self.shape {
            Shape::Full(kernel) => (kernel.radius_x(), kernel.radius_y()),
            Shape::Separable { row, column } => (row.radius_x(), column.radius_y()),
        }
    }

    #[inline]
    fn quantize(&self, sum: f64, band: usize, max: u16) -> u16 {
        let value = if self.abs { sum.abs() } else { sum };
        clamp_sample(band_map(&self.maps, band).apply(value), max)
    }

    fn convolve_full(
        &self,
        kernel: &Kernel,
        src: &Image,
        tile: &Tile,
        out: &mut TileWriter<'_>,
    ) {
        let (rx, ry) = (kernel.radius_x() as i64, kernel.radius_y() as i64);
        for loc in RasterScanner::samples(tile.writable_absolute(), src.bands()) {
            let (col, row) = (loc.col as i64, loc.row as i64);
            let mut sum = 0.0;
            for ky in 0..kernel.height {
                let y = row - (ky as i64 - ry);
                for kx in 0..kernel.width {
                    let x = col - (kx as i64 - rx);
                    sum += kernel.get(kx, ky) * self.padder.sample_f64(src, x, y, loc.band);
                }
            }
            let value = self.quantize(sum, loc.band, out.max_value(loc.band));
            out.set_sample(loc.col, loc.row, loc.band, value);
        }
    }

    fn convolve_separable(
        &self,
        row_kernel: &Kernel,
        column_kernel: &Kernel,
        src: &Image,
        tile: &Tile,
        out: &mut TileWriter<'_>,
    ) {
        let region = tile.writable_absolute();
        let (rx, ry) = (row_kernel.radius_x(), column_kernel.radius_y());
        let first = region.x as i64 - rx as i64;
        // column pass output for one row of the region plus its halo
        let mut columns = vec![0.0; region.width + 2 * rx];

        for row in region.y..region.bottom() {
            for band in 0..src.bands() {
                for (i, slot) in columns.iter_mut().enumerate() {
                    *slot = match self
                        .padder
                        .resolve(src.width(), src.height(), first + i as i64, row as i64)
                    {
                        Some((x, _)) => {
                            self.column_sum(column_kernel, src, x as i64, row as i64, ry, band)
                        }
                        None => 0.0,
                    };
                }

                for col in region.x..region.right() {
                    let offset = col - region.x + 2 * rx;
                    let sum: f64 = (0..row_kernel.width)
                        .map(|kx| row_kernel.get(kx, 0) * columns[offset - kx])
                        .sum();
                    let value = self.quantize(sum, band, out.max_value(band));
                    out.set_sample(col, row, band, value);
                }
            }
        }
    }

    #[inline]
    fn column_sum(
        &self,
        kernel: &Kernel,
        src: &Image,
        col: i64,
        row: i64,
        radius: usize,
        band: usize,
    ) -> f64 {
        (0..kernel.height)
            .map(|ky| {
                let y = row - (ky as i64 - radius as i64);
                kernel.get(0, ky) * self.padder.sample_f64(src, col, y, band)
            })
            .sum()
    }
}

impl TileOp for ConvolutionOp {
    fn layout(&self) -> TileLayout {
        let (pad_x, pad_y) = self.radius();
        TileLayout::Padded { pad_x, pad_y }
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        match &self.shape {
            Shape::Full(kernel) => self.convolve_full(kernel, src, tile, out),
            Shape::Separable { row, column } => {
                self.convolve_separable(row, column, src, tile, out)
            }
        }
        Ok(())
    }
}
