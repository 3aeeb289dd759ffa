//! Inverse coordinate mapping for pull-based resampling.
//!
//! For every destination pixel a mapper yields the source location to
//! sample. Mappers are plain parameter sets; the only state is the
//! per-image frame computed by [`Mapper::initialize_mapping`], which must run
//! before any concurrent sampling starts.

#[cfg(test)]
mod tests;

use glam::{DAffine2, DVec2};

use crate::error::{Error, Result};
use crate::padder::Padder;
use crate::raster::{Raster, Rect};

/// Determinants below this magnitude are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Longest axis a scaling may produce.
pub const MAX_SCALED_LEN: usize = 1 << 20;

/// Destination to source coordinate transform.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapper {
    Scaling(ScalingMapper),
    Affine(AffineMapper),
    Twirl(TwirlMapper),
}

impl Mapper {
    /// Source location of destination point `dst`.
    #[inline]
    pub fn inverse_transform(&self, dst: DVec2) -> DVec2 {
        match self {
            Mapper::Scaling(m) => m.inverse_transform(dst),
            Mapper::Affine(m) => m.inverse_transform(dst),
            Mapper::Twirl(m) => m.inverse_transform(dst),
        }
    }

    /// One-time, single-threaded precomputation for `src`.
    pub fn initialize_mapping<R: Raster + ?Sized>(&mut self, src: &R) {
        if let Mapper::Twirl(m) = self {
            m.initialize_mapping(src);
        }
    }

    /// Bounds of the destination image for `src`.
    pub fn destination_bounds<R: Raster + ?Sized>(&self, src: &R) -> Result<Rect> {
        match self {
            Mapper::Scaling(m) => m.destination_bounds(src),
            Mapper::Affine(_) | Mapper::Twirl(_) => Ok(src.bounds()),
        }
    }

    /// Padding strategy that suits this mapping best.
    pub fn default_padder(&self) -> Padder {
        match self {
            Mapper::Scaling(_) | Mapper::Affine(_) => Padder::ExtendedBorder,
            Mapper::Twirl(_) => Padder::Reflective,
        }
    }
}

/// Axis-aligned scaling, `src = dst / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingMapper {
    scale: DVec2,
}

impl ScalingMapper {
    pub fn new(scale_x: f64, scale_y: f64) -> Result<Self> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if !valid(scale_x) || !valid(scale_y) {
            return Err(Error::InvalidScale {
                x: scale_x,
                y: scale_y,
            });
        }
        Ok(Self {
            scale: DVec2::new(scale_x, scale_y),
        })
    }

    /// Scale factor one on both axes.
    pub fn identity() -> Self {
        Self { scale: DVec2::ONE }
    }

    pub fn uniform(scale: f64) -> Result<Self> {
        Self::new(scale, scale)
    }

    pub fn scale(&self) -> DVec2 {
        self.scale
    }

    #[inline]
    pub fn inverse_transform(&self, dst: DVec2) -> DVec2 {
        dst / self.scale
    }

    /// `round(source × scale)` on each axis, at least one pixel.
    ///
    /// Fails with [`Error::ScaledLengthTooLarge`] past [`MAX_SCALED_LEN`].
    pub fn destination_bounds<R: Raster + ?Sized>(&self, src: &R) -> Result<Rect> {
        Ok(Rect::from_size(
            scaled_len(src.width(), self.scale.x)?,
            scaled_len(src.height(), self.scale.y)?,
        ))
    }
}

/// Scaled length of an axis, rounded half-up and never below one pixel.
pub(crate) fn scaled_len(len: usize, scale: f64) -> Result<usize> {
    let scaled = (len as f64 * scale + 0.5).floor();
    if scaled > MAX_SCALED_LEN as f64 {
        return Err(Error::ScaledLengthTooLarge {
            len,
            scale,
            limit: MAX_SCALED_LEN,
        });
    }
    Ok((scaled as usize).max(1))
}

/// General affine transform, stored with its precomputed inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMapper {
    forward: DAffine2,
    inverse: DAffine2,
}

impl AffineMapper {
    /// Fails with [`Error::SingularTransform`] if `forward` is not invertible.
    pub fn new(forward: DAffine2) -> Result<Self> {
        let determinant = forward.matrix2.determinant();
        if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
            return Err(Error::SingularTransform { determinant });
        }
        Ok(Self {
            forward,
            inverse: forward.inverse(),
        })
    }

    /// Rotation by `angle` radians about the point `center`.
    pub fn rotation_about(center: DVec2, angle: f64) -> Result<Self> {
        Self::new(
            DAffine2::from_translation(center)
                * DAffine2::from_angle(angle)
                * DAffine2::from_translation(-center),
        )
    }

    pub fn forward(&self) -> DAffine2 {
        self.forward
    }

    #[inline]
    pub fn inverse_transform(&self, dst: DVec2) -> DVec2 {
        self.inverse.transform_point2(dst)
    }
}

/// Absolute twirl frame, fixed once per source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwirlFrame {
    pub center: DVec2,
    pub min_dim: f64,
}

/// Nonlinear vortex around a center given relative to the image size.
///
/// The radius is preserved and the polar angle perturbed by
/// `strength × (r − min_dim) / min_dim`. Until [`initialize_mapping`](Self::initialize_mapping)
/// has run the mapper is the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwirlMapper {
    center: DVec2,
    strength: f64,
    frame: Option<TwirlFrame>,
}

impl TwirlMapper {
    /// `center_x`/`center_y` are fractions of the image width/height.
    pub fn new(center_x: f64, center_y: f64, strength: f64) -> Self {
        Self {
            center: DVec2::new(center_x, center_y),
            strength,
            frame: None,
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn relative_center(&self) -> DVec2 {
        self.center
    }

    pub fn frame(&self) -> Option<TwirlFrame> {
        self.frame
    }

    pub fn initialize_mapping<R: Raster + ?Sized>(&mut self, src: &R) {
        let (width, height) = (src.width() as f64, src.height() as f64);
        self.frame = Some(TwirlFrame {
            center: DVec2::new(
                (self.center.x * width).floor() + 0.5,
                (self.center.y * height).floor() + 0.5,
            ),
            min_dim: width.min(height),
        });
    }

    #[inline]
    pub fn inverse_transform(&self, dst: DVec2) -> DVec2 {
        let Some(frame) = self.frame else {
            return dst;
        };
        let d = dst - frame.center;
        let r = d.length();
        let theta = d.y.atan2(d.x) + self.strength * (r - frame.min_dim) / frame.min_dim;
        frame.center + r * DVec2::from_angle(theta)
    }
}
