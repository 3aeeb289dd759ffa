//! Sample interpolation at fractional source coordinates.
//!
//! - **NearestNeighbor**: rounds to the nearest pixel.
//! - **Bilinear**: blends the 2×2 neighborhood.
//! - **Bicubic**: separable cubic convolution over the 4×4 neighborhood.
//!   Can overshoot the valid sample range near sharp edges; callers clamp
//!   before storing.
//!
//! All reads go through a [`Padder`], so points outside the raster are fine.


use glam::DVec2;

use crate::padder::Padder;
use crate::raster::Raster;

/// Side length of the bicubic neighborhood.
const BICUBIC_SIZE: usize = 4;

/// Interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    NearestNeighbor,
    #[default]
    Bilinear,
    Bicubic,
}

/// Reusable scratch space for [`Interpolation::interpolate`].
///
/// Query it once with [`Interpolation::support`] and reuse it across the
/// sampling loop.
#[derive(Debug, Clone, Default)]
pub enum Support {
    #[default]
    None,
    Neighborhood([[f64; BICUBIC_SIZE]; BICUBIC_SIZE]),
}

/// Rounds half-up, so `x.5` always goes to the right/bottom neighbor.
#[inline]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Linear blend of the four corners of a unit cell.
#[inline]
pub fn bilerp(dx: f64, dy: f64, f00: f64, f01: f64, f10: f64, f11: f64) -> f64 {
    f00 * (1.0 - dx) * (1.0 - dy) + f10 * dx * (1.0 - dy) + f01 * (1.0 - dx) * dy + f11 * dx * dy
}

/// Catmull-Rom cubic through `y1`..`y2`, `t` in [0, 1].
#[inline]
pub fn cubic(t: f64, y0: f64, y1: f64, y2: f64, y3: f64) -> f64 {
    y1 + 0.5
        * t
        * (y2 - y0 + t * (2.0 * y0 - 5.0 * y1 + 4.0 * y2 - y3 + t * (3.0 * (y1 - y2) + y3 - y0)))
}

/// Separable bicubic over `n[column][row]`: each column is reduced along
/// `dy` first, then the four results along `dx`.
#[inline]
pub fn bicubic(dx: f64, dy: f64, n: &[[f64; BICUBIC_SIZE]; BICUBIC_SIZE]) -> f64 {
    let c = |col: &[f64; BICUBIC_SIZE]| cubic(dy, col[0], col[1], col[2], col[3]);
    cubic(dx, c(&n[0]), c(&n[1]), c(&n[2]), c(&n[3]))
}

impl Interpolation {
    pub const ALL: [Interpolation; 3] = [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
    ];

    /// Scratch space this method needs.
    pub fn support(&self) -> Support {
        match self {
            Interpolation::NearestNeighbor | Interpolation::Bilinear => Support::None,
            Interpolation::Bicubic => Support::Neighborhood([[0.0; BICUBIC_SIZE]; BICUBIC_SIZE]),
        }
    }

    /// Interpolated value of `band` at `point`.
    ///
    /// Bicubic results may lie outside `[0, max_value]`.
    #[inline]
    pub fn interpolate<R: Raster + ?Sized>(
        &self,
        raster: &R,
        padder: Padder,
        point: DVec2,
        band: usize,
        support: &mut Support,
    ) -> f64 {
        match self {
            Interpolation::NearestNeighbor => padder.sample_f64(
                raster,
                round_half_up(point.x),
                round_half_up(point.y),
                band,
            ),
            Interpolation::Bilinear => interpolate_bilinear(raster, padder, point, band),
            Interpolation::Bicubic => match support {
                Support::Neighborhood(n) => interpolate_bicubic(raster, padder, point, band, n),
                Support::None => {
                    let mut n = [[0.0; BICUBIC_SIZE]; BICUBIC_SIZE];
                    interpolate_bicubic(raster, padder, point, band, &mut n)
                }
            },
        }
    }
}

#[inline]
fn interpolate_bilinear<R: Raster + ?Sized>(
    raster: &R,
    padder: Padder,
    point: DVec2,
    band: usize,
) -> f64 {
    let x0 = point.x.floor();
    let y0 = point.y.floor();
    let dx = point.x - x0;
    let dy = point.y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let f00 = padder.sample_f64(raster, x0, y0, band);
    let f01 = padder.sample_f64(raster, x0, y0 + 1, band);
    let f10 = padder.sample_f64(raster, x0 + 1, y0, band);
    let f11 = padder.sample_f64(raster, x0 + 1, y0 + 1, band);

    bilerp(dx, dy, f00, f01, f10, f11)
}

#[inline]
fn interpolate_bicubic<R: Raster + ?Sized>(
    raster: &R,
    padder: Padder,
    point: DVec2,
    band: usize,
    n: &mut [[f64; BICUBIC_SIZE]; BICUBIC_SIZE],
) -> f64 {
    let x = point.x.floor();
    let y = point.y.floor();
    let dx = point.x - x;
    let dy = point.y - y;
    let (x0, y0) = (x as i64 - 1, y as i64 - 1);

    for (i, column) in n.iter_mut().enumerate() {
        for (j, cell) in column.iter_mut().enumerate() {
            *cell = padder.sample_f64(raster, x0 + i as i64, y0 + j as i64, band);
        }
    }

    bicubic(dx, dy, n)
}
