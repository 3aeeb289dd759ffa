//! Separable filtered rescaling.
//!
//! Rescaling runs in two passes over precomputed [`ContributionTable`]s:
//! the horizontal pass convolves source rows into a temporary buffer of
//! `source rows × destination columns × bands`, the vertical pass convolves
//! that buffer into the destination. Building the tables is the expensive
//! part, so they are cached under a [`TableKey`] and rebuilt only when the
//! key changes.
//!
//! When all samples contributing to an output value are equal, that value is
//! copied through unchanged instead of being clamped. Integer-ratio
//! magnification hits this path for most pixels.

mod bresenham;
mod contribution;
mod filter;


pub use bresenham::{bresenham, bresenham_steps, bresenham_zoom};
pub use contribution::{Contribution, ContributionTable};
pub use filter::ResamplingFilter;

use crate::config::RescaleConfig;
use crate::error::Result;
use crate::mapper::ScalingMapper;
use crate::ops::{check_destination, TileOp};
use crate::raster::{clamp_sample, Image, Raster, Rect, TileWriter};
use crate::tiler::{Tile, TileLayout};

/// Inputs the contribution tables depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub src_width: usize,
    pub src_height: usize,
    pub dst_width: usize,
    pub dst_height: usize,
    pub filter: ResamplingFilter,
}

#[derive(Debug, Clone)]
struct Tables {
    key: TableKey,
    x: ContributionTable,
    y: ContributionTable,
}

impl Tables {
    fn build(key: TableKey) -> Self {
        Self {
            key,
            x: ContributionTable::new(key.filter, key.src_width, key.dst_width),
            y: ContributionTable::new(key.filter, key.src_height, key.dst_height),
        }
    }
}

/// Destination size used when the rescaler runs as a [`TileOp`] without an
/// explicit destination.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Scale(ScalingMapper),
    Size { width: usize, height: usize },
}

/// Two-pass separable rescaler with cached contribution tables.
#[derive(Debug, Clone)]
pub struct FilteredRescaling {
    config: RescaleConfig,
    target: Target,
    tables: Option<Tables>,
}

impl Default for FilteredRescaling {
    fn default() -> Self {
        Self::new(RescaleConfig::default())
    }
}

impl FilteredRescaling {
    /// Rescaler whose [`TileOp`] destination keeps the source size.
    pub fn new(config: RescaleConfig) -> Self {
        config.validate();
        Self {
            config,
            target: Target::Scale(ScalingMapper::identity()),
            tables: None,
        }
    }

    pub fn with_filter(filter: ResamplingFilter) -> Self {
        Self::new(RescaleConfig { filter })
    }

    /// Rescaler whose [`TileOp`] destination is `round(W × xscale) × round(H × yscale)`.
    pub fn scaled(config: RescaleConfig, xscale: f64, yscale: f64) -> Result<Self> {
        let scaling = ScalingMapper::new(xscale, yscale)?;
        Ok(Self::new(config).with_target(Target::Scale(scaling)))
    }

    /// Rescaler whose [`TileOp`] destination is `width × height`.
    pub fn sized(config: RescaleConfig, width: usize, height: usize) -> Self {
        Self::new(config).with_target(Target::Size { width, height })
    }

    fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn resampling_filter(&self) -> ResamplingFilter {
        self.config.filter
    }

    /// Switches the kernel. Cached tables become stale.
    pub fn set_resampling_filter(&mut self, filter: ResamplingFilter) {
        self.config.filter = filter;
    }

    /// Key of the cached tables, if any have been built.
    pub fn table_key(&self) -> Option<TableKey> {
        self.tables.as_ref().map(|t| t.key)
    }

    /// Cached `(X, Y)` tables, if any have been built.
    pub fn tables(&self) -> Option<(&ContributionTable, &ContributionTable)> {
        self.tables.as_ref().map(|t| (&t.x, &t.y))
    }

    /// Rescales `src` by `xscale × yscale` into a new image.
    pub fn zoom(&mut self, src: &Image, xscale: f64, yscale: f64) -> Result<Image> {
        let bounds = ScalingMapper::new(xscale, yscale)?.destination_bounds(src)?;
        let dst = src.compatible(bounds.width, bounds.height)?;
        self.zoom_into(src, dst)
    }

    /// Rescales `src` to the size of `dst`, overwriting it.
    pub fn zoom_into(&mut self, src: &Image, mut dst: Image) -> Result<Image> {
        check_destination(TileLayout::Destination, src, &dst)?;
        self.ensure_tables(src, &dst);
        let region = dst.bounds();
        if let Some(tables) = &self.tables {
            apply(tables, src, region, &mut TileWriter::whole(&mut dst));
        }
        Ok(dst)
    }

    fn key_for(&self, src: Rect, dst: Rect) -> TableKey {
        TableKey {
            src_width: src.width,
            src_height: src.height,
            dst_width: dst.width,
            dst_height: dst.height,
            filter: self.config.filter,
        }
    }

    /// Rebuilds the tables unless they already match. Returns whether it did.
    fn ensure_tables(&mut self, src: &Image, dst: &Image) -> bool {
        let key = self.key_for(src.bounds(), dst.bounds());
        if self.table_key() == Some(key) {
            return false;
        }
        tracing::debug!(?key, "Rebuilding contribution tables");
        self.tables = Some(Tables::build(key));
        true
    }
}

impl TileOp for FilteredRescaling {
    fn layout(&self) -> TileLayout {
        TileLayout::Destination
    }

    fn dest_for(&self, src: &Image) -> Result<Image> {
        let (width, height) = match self.target {
            Target::Scale(scaling) => {
                let bounds = scaling.destination_bounds(src)?;
                (bounds.width, bounds.height)
            }
            Target::Size { width, height } => (width, height),
        };
        src.compatible(width, height)
    }

    fn prepare(&mut self, src: &Image, dst: &Image) -> Result<()> {
        self.ensure_tables(src, dst);
        Ok(())
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        let key = self.key_for(src.bounds(), out.image_bounds());
        let region = tile.writable_absolute();
        match &self.tables {
            Some(tables) if tables.key == key => apply(tables, src, region, out),
            _ => apply(&Tables::build(key), src, region, out),
        }
        Ok(())
    }
}

/// Weighted sum of the contributing samples, clamped to `[0, max]`.
///
/// If every contributing sample equals the first, that sample is returned
/// as is.
#[inline]
fn convolve(contributions: &[Contribution], max: f64, sample: impl Fn(usize) -> f64) -> f64 {
    let first = sample(contributions[0].pixel);
    let mut sum = 0.0;
    let mut delta = false;
    for c in contributions {
        let value = sample(c.pixel);
        delta |= value != first;
        sum += value * c.weight;
    }
    if delta {
        sum.clamp(0.0, max)
    } else {
        first
    }
}

/// Runs both passes for the destination pixels in `region`.
fn apply(tables: &Tables, src: &Image, region: Rect, out: &mut TileWriter<'_>) {
    if region.is_empty() {
        return;
    }
    let bands = src.bands();
    let width = region.width;
    let (first_row, last_row) = tables.y.source_span(region.y..region.bottom());
    let rows = last_row - first_row + 1;
    let mut tmp = vec![0.0f64; rows * width * bands];

    for k in 0..rows {
        let sy = first_row + k;
        for (i, dx) in (region.x..region.right()).enumerate() {
            let contributions = tables.x.get(dx);
            for band in 0..bands {
                let max = src.max_value(band) as f64;
                tmp[(k * width + i) * bands + band] =
                    convolve(contributions, max, |p| src.sample(p, sy, band) as f64);
            }
        }
    }

    for dy in region.y..region.bottom() {
        let contributions = tables.y.get(dy);
        for (i, dx) in (region.x..region.right()).enumerate() {
            for band in 0..bands {
                let max = out.max_value(band);
                let value = convolve(contributions, max as f64, |p| {
                    tmp[((p - first_row) * width + i) * bands + band]
                });
                out.set_sample(dx, dy, band, clamp_sample(value, max));
            }
        }
    }
}
