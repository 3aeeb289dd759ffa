//! Error types for raster operations.

use thiserror::Error;

use crate::raster::{ImageDimensions, Rect};

/// Errors that can occur while resampling or processing tiles.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Affine transform is not invertible (determinant {determinant:e})")]
    SingularTransform { determinant: f64 },

    #[error("Invalid tile size {width}x{height}: both dimensions must be positive")]
    InvalidTileSize { width: usize, height: usize },

    #[error("Invalid scale factors ({x}, {y}): both must be finite and positive")]
    InvalidScale { x: f64, y: f64 },

    #[error("Scaled length {len} x {scale} exceeds the limit of {limit} pixels")]
    ScaledLengthTooLarge { len: usize, scale: f64, limit: usize },

    #[error("Invalid thread count {threads}: must be positive")]
    InvalidThreadCount { threads: usize },

    #[error("Invalid range [{min}, {max}]: bounds must not be NaN and min must not exceed max")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid kernel {width}x{height} with {len} values: dimensions must be odd and match the value count")]
    InvalidKernel {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("Image must not be empty, got {width}x{height} with {bands} bands")]
    EmptyImage {
        width: usize,
        height: usize,
        bands: usize,
    },

    #[error("Sample {value} exceeds maximum {max} of band {band}")]
    SampleOutOfRange { value: u16, max: u16, band: usize },

    #[error("Invalid bit depth {bits}: must be in 1..=16")]
    InvalidBitDepth { bits: u8 },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: ImageDimensions,
        actual: ImageDimensions,
    },

    #[error("Bit depth mismatch: expected {expected:?}, got {actual:?}")]
    DepthMismatch { expected: Vec<u8>, actual: Vec<u8> },

    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    #[error("Band {band} out of range for image with {bands} bands")]
    BandOutOfRange { band: usize, bands: usize },

    #[error("Tile {tile} failed: {message}")]
    TileFailed { tile: Rect, message: String },

    #[error("Tile {tile} panicked: {message}")]
    TilePanicked { tile: Rect, message: String },

    #[error("Pool task panicked: {message}")]
    TaskPanicked { message: String },

    #[error("Failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_transform_message() {
        let err = Error::SingularTransform { determinant: 0.0 };
        assert!(err.to_string().contains("not invertible"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = Error::DimensionMismatch {
            expected: ImageDimensions {
                width: 10,
                height: 20,
                bands: 3,
            },
            actual: ImageDimensions {
                width: 11,
                height: 20,
                bands: 3,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("11"));
    }

    #[test]
    fn test_depth_mismatch_lists_depths() {
        let err = Error::DepthMismatch {
            expected: vec![8, 8],
            actual: vec![1, 8],
        };
        let msg = err.to_string();
        assert!(msg.contains("[8, 8]"), "{msg}");
        assert!(msg.contains("[1, 8]"), "{msg}");
    }

    #[test]
    fn test_tile_failed_message_names_tile() {
        let err = Error::TileFailed {
            tile: Rect::new(16, 32, 8, 4),
            message: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("8x4+16+32"), "{msg}");
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn std::any::Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(s.as_ref()), "unknown panic payload");
    }
}
