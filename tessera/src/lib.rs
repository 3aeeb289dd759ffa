//! Tessera - tiled, multi-threaded raster resampling.
//!
//! This library provides:
//! - Integer-sample images with per-band bit depths
//! - Border padding, inverse coordinate mapping and interpolation
//! - Geometric transforms (scaling, affine, twirl), rank filters and convolution
//! - Per-band linear rescaling and global thresholding
//! - Two-pass separable filtered rescaling with cached contribution tables
//! - A worker pool that runs any [`TileOp`] concurrently, one task per tile
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tessera::{ConcurrentTileOp, FilteredRescaling, TileConfig, WorkerPool};
//!
//! let pool = WorkerPool::with_threads(4)?;
//! let rescaler = FilteredRescaling::scaled(Default::default(), 0.5, 0.5)?;
//! let mut op = ConcurrentTileOp::new(rescaler, TileConfig::default(), &pool)?;
//! let half = op.filter(&image, None)?;
//! pool.shutdown();
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod interpolation;
pub mod mapper;
pub mod ops;
pub mod padder;
pub mod pool;
pub mod raster;
pub mod rescaling;
pub mod tiler;

#[cfg(test)]
mod testing;

// ============================================================================
// Core raster types
// ============================================================================

pub use error::{Error, Result};
pub use raster::{
    max_value_for_depth, Image, ImageDimensions, ImageView, Location, Raster, RasterScanner,
    Rect, SharedDest, TileWriter, MAX_BIT_DEPTH,
};

// ============================================================================
// Sampling
// ============================================================================

pub use interpolation::{Interpolation, Support};
pub use mapper::{
    AffineMapper, Mapper, ScalingMapper, TwirlFrame, TwirlMapper, MAX_SCALED_LEN,
};
pub use padder::Padder;

// ============================================================================
// Tiling and concurrency
// ============================================================================

pub use config::{PoolConfig, RescaleConfig, TileConfig};
pub use pool::{TaskHandle, WorkerPool};
pub use tiler::{PaddedTiler, Tile, TileLayout, Tiler};

// ============================================================================
// Operations
// ============================================================================

pub use ops::{
    check_destination, ConcurrentTileOp, ConvolutionOp, GeometricTransformOp, GlobalThresholdOp,
    InvertOp, Kernel, LinearMap, Rank, RankOp, RescaleOp, ThresholdMethod, TileOp,
};
pub use rescaling::{
    bresenham, bresenham_steps, bresenham_zoom, Contribution, ContributionTable,
    FilteredRescaling, ResamplingFilter, TableKey,
};

// ============================================================================
// Image statistics
// ============================================================================

pub use features::{equalize, Histogram, MinMax};
