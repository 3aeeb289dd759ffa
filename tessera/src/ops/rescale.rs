use crate::error::{Error, Result};
use crate::raster::{
    clamp_sample, max_value_for_depth, Image, Raster, RasterScanner, TileWriter, MAX_BIT_DEPTH,
};
use crate::tiler::Tile;

use super::{check_size, TileOp};

/// `clamp(gain · v + bias, min, max)` on one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    gain: f64,
    bias: f64,
    min: f64,
    max: f64,
}

impl Default for LinearMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LinearMap {
    pub const IDENTITY: Self = Self {
        gain: 1.0,
        bias: 0.0,
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Unbounded `gain · v + bias`.
    pub fn new(gain: f64, bias: f64) -> Self {
        Self {
            gain,
            bias,
            ..Self::IDENTITY
        }
    }

    /// Maps `[src_min, src_max]` linearly onto `[dst_min, dst_max]` and
    /// clamps to the latter.
    pub fn between(src: (f64, f64), dst: (f64, f64)) -> Result<Self> {
        let finite = [src.0, src.1, dst.0, dst.1].iter().all(|v| v.is_finite());
        if !finite || src.0 == src.1 {
            return Err(Error::InvalidRange {
                min: src.0,
                max: src.1,
            });
        }
        let gain = (dst.1 - dst.0) / (src.1 - src.0);
        let map = Self::new(gain, dst.1 - gain * src.1);
        map.clamped(dst.0.min(dst.1), dst.0.max(dst.1))
    }

    /// Restricts the output to `[min, max]`.
    pub fn clamped(self, min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(Error::InvalidRange { min, max });
        }
        Ok(Self { min, max, ..self })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        (self.gain * value + self.bias).clamp(self.min, self.max)
    }
}

/// Map of `band`; bands past the end reuse the last map.
pub(crate) fn band_map(maps: &[LinearMap], band: usize) -> LinearMap {
    maps.get(band)
        .or(maps.last())
        .copied()
        .unwrap_or(LinearMap::IDENTITY)
}

/// Per-band linear rescaling of sample values.
///
/// Results are rounded half-up and clamped to the destination band's range,
/// so the destination may use a different bit depth than the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RescaleOp {
    maps: Vec<LinearMap>,
    depth: Option<u8>,
}

impl RescaleOp {
    /// One map per band. Bands without a map of their own reuse the last one.
    pub fn new(maps: Vec<LinearMap>) -> Self {
        Self { maps, depth: None }
    }

    pub fn uniform(map: LinearMap) -> Self {
        Self::new(vec![map])
    }

    /// Stretches the full range of every band of `src` onto `bits`.
    pub fn to_depth(src: &Image, bits: u8) -> Result<Self> {
        let mut op = Self::default().with_depth(bits)?;
        let target = f64::from(max_value_for_depth(bits));
        op.maps = src
            .max_values()
            .iter()
            .map(|&max| LinearMap::between((0.0, f64::from(max)), (0.0, target)))
            .collect::<Result<_>>()?;
        Ok(op)
    }

    /// Bit depth of every band of the destination [`dest_for`](TileOp::dest_for) creates.
    pub fn with_depth(mut self, bits: u8) -> Result<Self> {
        if bits == 0 || bits > MAX_BIT_DEPTH {
            return Err(Error::InvalidBitDepth { bits });
        }
        self.depth = Some(bits);
        Ok(self)
    }

    pub fn map(&self, band: usize) -> LinearMap {
        band_map(&self.maps, band)
    }

    pub fn depth(&self) -> Option<u8> {
        self.depth
    }
}

impl TileOp for RescaleOp {
    fn dest_for(&self, src: &Image) -> Result<Image> {
        match self.depth {
            Some(bits) => Image::new(src.width(), src.height(), src.bands(), bits),
            None => src.compatible(src.width(), src.height()),
        }
    }

    fn validate_destination(&self, src: &Image, dst: &Image) -> Result<()> {
        check_size(src, dst)
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        for loc in RasterScanner::samples(tile.writable_absolute(), src.bands()) {
            let value = self
                .map(loc.band)
                .apply(f64::from(src.sample(loc.col, loc.row, loc.band)));
            out.set_sample(
                loc.col,
                loc.row,
                loc.band,
                clamp_sample(value, out.max_value(loc.band)),
            );
        }
        Ok(())
    }
}
