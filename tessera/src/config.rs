//! Configuration types.
//!
//! All tunables of the pool, the tile dispatcher and the rescaler are
//! consolidated here. `validate` asserts invariants on hand-built configs;
//! constructors that accept user input return [`Error`] instead.

use crate::error::{Error, Result};
use crate::rescaling::ResamplingFilter;

// =============================================================================
// Worker pool configuration
// =============================================================================

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. `None` uses the host's available parallelism.
    pub num_threads: Option<usize>,
    /// Worker thread names are `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl PoolConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Self::default()
        }
    }

    /// Worker count this config resolves to.
    pub fn resolved_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Fallible counterpart of [`validate`](Self::validate) for the thread count.
    pub fn check(&self) -> Result<()> {
        match self.num_threads {
            Some(0) => Err(Error::InvalidThreadCount { threads: 0 }),
            _ => Ok(()),
        }
    }

    pub fn validate(&self) {
        if let Some(n) = self.num_threads {
            assert!(n > 0, "num_threads must be positive");
        }
        assert!(
            !self.thread_name_prefix.is_empty(),
            "thread_name_prefix must not be empty"
        );
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "tessera-worker".to_string(),
        }
    }
}

// =============================================================================
// Tiling configuration
// =============================================================================

/// Tile size used by [`ConcurrentTileOp`](crate::ConcurrentTileOp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileConfig {
    pub tile_width: usize,
    pub tile_height: usize,
}

impl TileConfig {
    pub const DEFAULT_TILE_SIZE: usize = 256;

    pub fn new(tile_width: usize, tile_height: usize) -> Result<Self> {
        let config = Self {
            tile_width,
            tile_height,
        };
        config.check()?;
        Ok(config)
    }

    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    /// Fallible counterpart of [`validate`](Self::validate).
    pub fn check(&self) -> Result<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(Error::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        Ok(())
    }

    pub fn validate(&self) {
        assert!(self.tile_width > 0, "tile_width must be positive");
        assert!(self.tile_height > 0, "tile_height must be positive");
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_width: Self::DEFAULT_TILE_SIZE,
            tile_height: Self::DEFAULT_TILE_SIZE,
        }
    }
}

// =============================================================================
// Rescaling configuration
// =============================================================================

/// Configuration for [`FilteredRescaling`](crate::FilteredRescaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RescaleConfig {
    /// Kernel used for both axes. Default Catmull-Rom.
    pub filter: ResamplingFilter,
}

impl RescaleConfig {
    pub fn validate(&self) {
        let support = self.filter.support();
        assert!(
            support.is_finite() && support > 0.0,
            "filter support must be positive"
        );
    }
}
