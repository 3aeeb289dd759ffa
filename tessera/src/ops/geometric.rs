use glam::{DAffine2, DVec2};

use crate::error::{Error, Result};
use crate::interpolation::Interpolation;
use crate::mapper::{AffineMapper, Mapper, ScalingMapper, TwirlMapper};
use crate::padder::Padder;
use crate::raster::{clamp_sample, Image, RasterScanner, TileWriter};
use crate::tiler::{Tile, TileLayout};

use super::TileOp;

/// Offset from a mapped destination coordinate to the sampled source point.
const PIXEL_SHIFT: f64 = -0.5;

/// Inverse-mapped geometric transform.
///
/// Every destination pixel `(c, r)` samples the source at
/// `mapper.inverse_transform(c, r) − 0.5` through `interpolation` and
/// `padder`. Results are rounded half-up and clamped to the band's range;
/// an optional per-band range narrows the clamp further.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricTransformOp {
    mapper: Mapper,
    interpolation: Interpolation,
    padder: Padder,
    clamp: Option<Vec<(f64, f64)>>,
}

impl GeometricTransformOp {
    /// Transform with the mapper's preferred padder and no extra clamping.
    pub fn new(mapper: Mapper, interpolation: Interpolation) -> Self {
        let padder = mapper.default_padder();
        Self {
            mapper,
            interpolation,
            padder,
            clamp: None,
        }
    }

    /// Rescales by `scale_x × scale_y`.
    pub fn resample(scale_x: f64, scale_y: f64, interpolation: Interpolation) -> Result<Self> {
        Ok(Self::new(
            Mapper::Scaling(ScalingMapper::new(scale_x, scale_y)?),
            interpolation,
        ))
    }

    /// Twirls around `(center_x, center_y)`, given as fractions of the image size.
    pub fn twirl(
        center_x: f64,
        center_y: f64,
        strength: f64,
        interpolation: Interpolation,
    ) -> Self {
        Self::new(
            Mapper::Twirl(TwirlMapper::new(center_x, center_y, strength)),
            interpolation,
        )
    }

    /// Applies the forward transform `transform`.
    pub fn affine(transform: DAffine2, interpolation: Interpolation) -> Result<Self> {
        Ok(Self::new(
            Mapper::Affine(AffineMapper::new(transform)?),
            interpolation,
        ))
    }

    pub fn with_padder(mut self, padder: Padder) -> Self {
        self.padder = padder;
        self
    }

    /// Clamps band `i` to `[min[i], max[i]]` before quantization.
    ///
    /// Both slices must have the same length and every range must be
    /// ordered and free of NaN.
    pub fn with_clamp(mut self, min: &[f64], max: &[f64]) -> Result<Self> {
        if min.len() != max.len() {
            return Err(Error::SampleCountMismatch {
                expected: min.len(),
                actual: max.len(),
            });
        }
        let ranges = min.iter().copied().zip(max.iter().copied());
        for (lo, hi) in ranges.clone() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(Error::InvalidRange { min: lo, max: hi });
            }
        }
        self.clamp = Some(ranges.collect());
        Ok(self)
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn padder(&self) -> Padder {
        self.padder
    }
}

impl TileOp for GeometricTransformOp {
    fn layout(&self) -> TileLayout {
        TileLayout::Destination
    }

    fn dest_for(&self, src: &Image) -> Result<Image> {
        let bounds = self.mapper.destination_bounds(src)?;
        src.compatible(bounds.width, bounds.height)
    }

    fn prepare(&mut self, src: &Image, _dst: &Image) -> Result<()> {
        self.mapper.initialize_mapping(src);
        Ok(())
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        let mut support = self.interpolation.support();
        let bands = out.bands();

        for loc in RasterScanner::pixels(tile.writable_absolute()) {
            let dst_point = DVec2::new(loc.col as f64, loc.row as f64);
            let src_point =
                self.mapper.inverse_transform(dst_point) + DVec2::splat(PIXEL_SHIFT);

            for band in 0..bands {
                let mut value = self.interpolation.interpolate(
                    src,
                    self.padder,
                    src_point,
                    band,
                    &mut support,
                );
                if let Some((lo, hi)) = self.clamp.as_ref().and_then(|c| c.get(band)) {
                    value = value.clamp(*lo, *hi);
                }
                out.set_sample(
                    loc.col,
                    loc.row,
                    band,
                    clamp_sample(value, out.max_value(band)),
                );
            }
        }
        Ok(())
    }
}
