//! Decomposition of a raster into rectangular units of parallel work.
//!
//! A [`Tiler`] yields non-overlapping tiles in raster order. A [`PaddedTiler`]
//! grows each of them by a halo, clipped to the image, and records which part
//! of the grown tile is the original one: only that writable region is ever
//! committed to a destination.


use crate::error::{Error, Result};
use crate::raster::Rect;

/// A unit of tile-parallel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Region to read, in absolute coordinates. Includes the halo, if any.
    pub bounds: Rect,
    /// Region to write, relative to `bounds`.
    pub writable: Rect,
}

impl Tile {
    /// A tile without halo: readable and writable regions coincide.
    pub fn plain(bounds: Rect) -> Self {
        Self {
            bounds,
            writable: Rect::from_size(bounds.width, bounds.height),
        }
    }

    /// The writable region in absolute coordinates.
    #[inline]
    pub fn writable_absolute(&self) -> Rect {
        self.writable.translate(self.bounds.x, self.bounds.y)
    }

    pub fn has_halo(&self) -> bool {
        self.writable_absolute() != self.bounds
    }
}

fn check_tile_size(tile_width: usize, tile_height: usize) -> Result<()> {
    if tile_width == 0 || tile_height == 0 {
        return Err(Error::InvalidTileSize {
            width: tile_width,
            height: tile_height,
        });
    }
    Ok(())
}

/// Splits `area` into `tile_width × tile_height` tiles, row by row.
///
/// Tiles at the right and bottom edges are cut to fit; an axis of length `n`
/// yields `ceil(n / tile)` tiles.
#[derive(Debug, Clone)]
pub struct Tiler {
    area: Rect,
    tile_width: usize,
    tile_height: usize,
    cols: usize,
    rows: usize,
    next: usize,
}

impl Tiler {
    pub fn new(area: Rect, tile_width: usize, tile_height: usize) -> Result<Self> {
        check_tile_size(tile_width, tile_height)?;
        Ok(Self {
            area,
            tile_width,
            tile_height,
            cols: area.width.div_ceil(tile_width),
            rows: area.height.div_ceil(tile_height),
            next: 0,
        })
    }

    /// Tile count along x.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile count along y.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    fn rect_at(&self, index: usize) -> Rect {
        let (col, row) = (index % self.cols, index / self.cols);
        let x = col * self.tile_width;
        let y = row * self.tile_height;
        Rect::new(
            self.area.x + x,
            self.area.y + y,
            self.tile_width.min(self.area.width - x),
            self.tile_height.min(self.area.height - y),
        )
    }
}

impl Iterator for Tiler {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.next >= self.tile_count() {
            return None;
        }
        let rect = self.rect_at(self.next);
        self.next += 1;
        Some(Tile::plain(rect))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tile_count() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiler {}

/// [`Tiler`] whose tiles carry a halo of `pad_x × pad_y` pixels per side.
///
/// The halo is clipped to `area`, so border tiles have a thinner halo on the
/// outer side. Writable regions are exactly the tiles of the inner [`Tiler`]
/// whatever the padding.
#[derive(Debug, Clone)]
pub struct PaddedTiler {
    inner: Tiler,
    pad_x: usize,
    pad_y: usize,
}

impl PaddedTiler {
    pub fn new(
        area: Rect,
        tile_width: usize,
        tile_height: usize,
        pad_x: usize,
        pad_y: usize,
    ) -> Result<Self> {
        Ok(Self {
            inner: Tiler::new(area, tile_width, tile_height)?,
            pad_x,
            pad_y,
        })
    }

    pub fn padding(&self) -> (usize, usize) {
        (self.pad_x, self.pad_y)
    }

    pub fn tile_count(&self) -> usize {
        self.inner.tile_count()
    }

    fn pad(&self, core: Rect) -> Tile {
        let area = self.inner.area;
        let x = core.x.saturating_sub(self.pad_x).max(area.x);
        let y = core.y.saturating_sub(self.pad_y).max(area.y);
        let right = (core.right() + self.pad_x).min(area.right());
        let bottom = (core.bottom() + self.pad_y).min(area.bottom());
        Tile {
            bounds: Rect::new(x, y, right - x, bottom - y),
            writable: Rect::new(core.x - x, core.y - y, core.width, core.height),
        }
    }
}

impl Iterator for PaddedTiler {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        let core = self.inner.next()?.bounds;
        Some(self.pad(core))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PaddedTiler {}

/// How an operation wants its work split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileLayout {
    /// Plain tiles over the source; destination has the source's size.
    #[default]
    Source,
    /// Tiles over the source with a halo of context pixels.
    Padded { pad_x: usize, pad_y: usize },
    /// Plain tiles over the destination, for inverse-mapped operations.
    Destination,
}

impl TileLayout {
    /// All tiles of this layout for the given source and destination bounds.
    pub fn tiles(
        &self,
        src: Rect,
        dst: Rect,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<Vec<Tile>> {
        let tiles = match *self {
            TileLayout::Source => Tiler::new(src, tile_width, tile_height)?.collect(),
            TileLayout::Padded { pad_x, pad_y } => {
                PaddedTiler::new(src, tile_width, tile_height, pad_x, pad_y)?.collect()
            }
            TileLayout::Destination => Tiler::new(dst, tile_width, tile_height)?.collect(),
        };
        Ok(tiles)
    }

    /// Whether the destination must have the source's dimensions.
    pub fn requires_matching_destination(&self) -> bool {
        !matches!(self, TileLayout::Destination)
    }
}
