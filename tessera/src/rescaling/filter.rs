use std::f64::consts::PI;

/// Reconstruction kernel for [`FilteredRescaling`](super::FilteredRescaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResamplingFilter {
    /// Pixel replication, support 0.5.
    Box,
    /// Linear tent, support 1.
    Triangle,
    /// Smoothstep-shaped, support 1.
    Hermite,
    /// Interpolating cubic, support 2.
    #[default]
    CatmullRom,
    /// Mitchell-Netravali with B = C = 1/3, support 2. Not interpolating.
    Mitchell,
    /// Windowed sinc with three lobes, support 3.
    Lanczos3,
}

const MITCHELL_B: f64 = 1.0 / 3.0;
const MITCHELL_C: f64 = 1.0 / 3.0;

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let x = x * PI;
        x.sin() / x
    }
}

impl ResamplingFilter {
    pub const ALL: [ResamplingFilter; 6] = [
        ResamplingFilter::Box,
        ResamplingFilter::Triangle,
        ResamplingFilter::Hermite,
        ResamplingFilter::CatmullRom,
        ResamplingFilter::Mitchell,
        ResamplingFilter::Lanczos3,
    ];

    /// Half-width of the kernel; `weight` is zero beyond it.
    pub fn support(&self) -> f64 {
        match self {
            ResamplingFilter::Box => 0.5,
            ResamplingFilter::Triangle | ResamplingFilter::Hermite => 1.0,
            ResamplingFilter::CatmullRom | ResamplingFilter::Mitchell => 2.0,
            ResamplingFilter::Lanczos3 => 3.0,
        }
    }

    /// Kernel value at distance `x`.
    pub fn weight(&self, x: f64) -> f64 {
        match self {
            // half-open so that a point between two pixels picks exactly one
            ResamplingFilter::Box => {
                if (-0.5..0.5).contains(&x) {
                    1.0
                } else {
                    0.0
                }
            }
            ResamplingFilter::Triangle => {
                let x = x.abs();
                if x < 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            ResamplingFilter::Hermite => {
                let x = x.abs();
                if x < 1.0 {
                    (2.0 * x - 3.0) * x * x + 1.0
                } else {
                    0.0
                }
            }
            ResamplingFilter::CatmullRom => {
                let x = x.abs();
                if x < 1.0 {
                    0.5 * (2.0 + x * x * (-5.0 + x * 3.0))
                } else if x < 2.0 {
                    0.5 * (4.0 + x * (-8.0 + x * (5.0 - x)))
                } else {
                    0.0
                }
            }
            ResamplingFilter::Mitchell => {
                let (b, c) = (MITCHELL_B, MITCHELL_C);
                let x = x.abs();
                let xx = x * x;
                if x < 1.0 {
                    ((12.0 - 9.0 * b - 6.0 * c) * x * xx
                        + (-18.0 + 12.0 * b + 6.0 * c) * xx
                        + (6.0 - 2.0 * b))
                        / 6.0
                } else if x < 2.0 {
                    ((-b - 6.0 * c) * x * xx
                        + (6.0 * b + 30.0 * c) * xx
                        + (-12.0 * b - 48.0 * c) * x
                        + (8.0 * b + 24.0 * c))
                        / 6.0
                } else {
                    0.0
                }
            }
            ResamplingFilter::Lanczos3 => {
                let x = x.abs();
                if x < 3.0 {
                    sinc(x) * sinc(x / 3.0)
                } else {
                    0.0
                }
            }
        }
    }
}
