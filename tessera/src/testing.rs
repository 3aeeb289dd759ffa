//! Synthetic test images.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::{max_value_for_depth, Image};

/// Diagonal gradient, bands offset from each other.
pub fn gradient(width: usize, height: usize, bands: usize, bits: u8) -> Image {
    let max = max_value_for_depth(bits) as usize;
    let span = (width + height + bands).max(1);
    let mut samples = Vec::with_capacity(width * height * bands);
    for y in 0..height {
        for x in 0..width {
            for band in 0..bands {
                samples.push(((x + y + band) * max / span) as u16);
            }
        }
    }
    Image::from_samples(width, height, bands, bits, samples).unwrap()
}

/// Single-band checkerboard of `cell × cell` squares alternating 0 and max.
pub fn checkerboard(width: usize, height: usize, cell: usize, bits: u8) -> Image {
    let max = max_value_for_depth(bits);
    let samples = (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x / cell + y / cell) % 2 == 0 { 0 } else { max }))
        .collect();
    Image::from_samples(width, height, 1, bits, samples).unwrap()
}

/// Uniform noise over the full sample range, reproducible from `seed`.
pub fn noise(width: usize, height: usize, bands: usize, bits: u8, seed: u64) -> Image {
    noise_below(width, height, bands, bits, max_value_for_depth(bits), seed)
}

/// Uniform noise in `[0, limit]`.
pub fn noise_below(
    width: usize,
    height: usize,
    bands: usize,
    bits: u8,
    limit: u16,
    seed: u64,
) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..width * height * bands)
        .map(|_| rng.random_range(0..=limit))
        .collect();
    Image::from_samples(width, height, bands, bits, samples).unwrap()
}
