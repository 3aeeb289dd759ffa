//! Tile-parallel image operations.
//!
//! An operation implements [`TileOp`]: it knows how to fill one tile of the
//! destination and which [`TileLayout`] its work should be split into.
//! [`ConcurrentTileOp`] runs any such operation on a [`WorkerPool`], one task
//! per tile. The destination is shared between tasks without locking; each
//! task gets a [`TileWriter`] restricted to its own writable region, and the
//! regions of a layout partition the destination.
//!
//! # Failure policy
//!
//! A failing or panicking tile does not cancel the others. Every tile runs
//! to completion, then the first error observed is returned. The destination
//! is partially written at that point and should be discarded.

mod convolution;
mod geometric;
mod invert;
mod rank;
mod rescale;
mod threshold;


pub use convolution::{ConvolutionOp, Kernel};
pub use geometric::GeometricTransformOp;
pub use invert::InvertOp;
pub use rank::{Rank, RankOp};
pub use rescale::{LinearMap, RescaleOp};
pub use threshold::{GlobalThresholdOp, ThresholdMethod};

use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

use crate::config::TileConfig;
use crate::error::{panic_message, Error, Result};
use crate::pool::WorkerPool;
use crate::raster::{Image, Raster, SharedDest, TileWriter};
use crate::tiler::{Tile, TileLayout};

/// An operation that can compute its output one tile at a time.
///
/// `filter_tile` is called concurrently from several workers, hence `Sync`.
/// Per-image setup belongs in [`prepare`](Self::prepare), which runs once on
/// the calling thread before any tile.
pub trait TileOp: Sync {
    fn layout(&self) -> TileLayout {
        TileLayout::Source
    }

    /// Zero-filled destination for `src`. Default: same size, bands and depths.
    fn dest_for(&self, src: &Image) -> Result<Image> {
        src.compatible(src.width(), src.height())
    }

    /// Rejects a destination this operation cannot fill.
    ///
    /// The default applies [`check_destination`] for [`layout`](Self::layout).
    fn validate_destination(&self, src: &Image, dst: &Image) -> Result<()> {
        check_destination(self.layout(), src, dst)
    }

    /// Runs once per application, after the destination is known.
    fn prepare(&mut self, _src: &Image, _dst: &Image) -> Result<()> {
        Ok(())
    }

    /// Computes `tile`, writing only inside `tile.writable_absolute()`.
    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()>;

    /// Applies the operation on the calling thread as one whole-image tile.
    fn filter(&mut self, src: &Image, dst: Option<Image>) -> Result<Image> {
        let mut dst = match dst {
            Some(dst) => dst,
            None => self.dest_for(src)?,
        };
        let layout = self.layout();
        self.validate_destination(src, &dst)?;
        self.prepare(src, &dst)?;

        let tile = match layout {
            TileLayout::Destination => Tile::plain(dst.bounds()),
            TileLayout::Source | TileLayout::Padded { .. } => Tile::plain(src.bounds()),
        };
        self.filter_tile(src, &tile, &mut TileWriter::whole(&mut dst))?;
        Ok(dst)
    }
}

/// Verifies that `dst` can receive the output of a `layout` operation on `src`.
///
/// Source and padded layouts copy sample ranges through unchanged, so they
/// need the same size, bands and bit depths. Destination layouts only need
/// the same band count; their output is clamped to the destination's range.
pub fn check_destination(layout: TileLayout, src: &Image, dst: &Image) -> Result<()> {
    if !layout.requires_matching_destination() {
        return check_bands(src, dst);
    }
    check_size(src, dst)?;
    if src.depths() != dst.depths() {
        return Err(Error::DepthMismatch {
            expected: src.depths().to_vec(),
            actual: dst.depths().to_vec(),
        });
    }
    Ok(())
}

fn check_bands(src: &Image, dst: &Image) -> Result<()> {
    if src.bands() != dst.bands() {
        return Err(Error::DimensionMismatch {
            expected: src.dimensions(),
            actual: dst.dimensions(),
        });
    }
    Ok(())
}

/// Same width, height and band count; bit depths may differ.
pub(crate) fn check_size(src: &Image, dst: &Image) -> Result<()> {
    if src.dimensions() != dst.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: src.dimensions(),
            actual: dst.dimensions(),
        });
    }
    Ok(())
}

/// Runs a [`TileOp`] on a worker pool, one task per tile.
pub struct ConcurrentTileOp<'p, T> {
    op: T,
    tiles: TileConfig,
    pool: &'p WorkerPool,
}

impl<'p, T: TileOp> ConcurrentTileOp<'p, T> {
    pub fn new(op: T, tiles: TileConfig, pool: &'p WorkerPool) -> Result<Self> {
        tiles.check()?;
        Ok(Self { op, tiles, pool })
    }

    pub fn op(&self) -> &T {
        &self.op
    }

    pub fn op_mut(&mut self) -> &mut T {
        &mut self.op
    }

    pub fn into_inner(self) -> T {
        self.op
    }

    pub fn tile_config(&self) -> TileConfig {
        self.tiles
    }

    /// Applies the operation concurrently and returns the destination.
    ///
    /// Blocks until every tile has finished. See the module docs for what
    /// happens when a tile fails.
    pub fn filter(&mut self, src: &Image, dst: Option<Image>) -> Result<Image> {
        let mut dst = match dst {
            Some(dst) => dst,
            None => self.op.dest_for(src)?,
        };
        let layout = self.op.layout();
        self.op.validate_destination(src, &dst)?;
        self.op.prepare(src, &dst)?;

        let tiles = layout.tiles(
            src.bounds(),
            dst.bounds(),
            self.tiles.tile_width,
            self.tiles.tile_height,
        )?;
        tracing::debug!(
            tiles = tiles.len(),
            tile_width = self.tiles.tile_width,
            tile_height = self.tiles.tile_height,
            threads = self.pool.size(),
            ?layout,
            "Dispatching tile operation"
        );

        let first_error: Mutex<Option<Error>> = Mutex::new(None);
        {
            let shared = SharedDest::new(&mut dst);
            let shared = &shared;
            let first_error = &first_error;
            let op = &self.op;

            self.pool.scope(|scope| {
                for tile in &tiles {
                    scope.spawn(move |_| {
                        let region = tile.writable_absolute();
                        // SAFETY: the writable regions of one layout are pairwise disjoint.
                        let mut out = unsafe { shared.writer(region) };
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            op.filter_tile(src, tile, &mut out)
                        }));
                        let error = match outcome {
                            Ok(Ok(())) => return,
                            Ok(Err(err)) => Error::TileFailed {
                                tile: region,
                                message: err.to_string(),
                            },
                            Err(payload) => Error::TilePanicked {
                                tile: region,
                                message: panic_message(payload.as_ref()),
                            },
                        };
                        tracing::warn!(tile = %region, %error, "Tile failed");
                        first_error.lock().get_or_insert(error);
                    });
                }
            });
        }

        match first_error.into_inner() {
            Some(error) => Err(error),
            None => Ok(dst),
        }
    }
}
