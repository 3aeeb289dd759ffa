use crate::error::Result;
use crate::padder::Padder;
use crate::raster::{Image, Raster, RasterScanner, TileWriter};
use crate::tiler::{Tile, TileLayout};

use super::TileOp;

/// Which order statistic of the window a [`RankOp`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Min,
    Median,
    Max,
}

impl Rank {
    /// Index into the sorted window of `cardinality` samples.
    pub fn index(&self, cardinality: usize) -> usize {
        match self {
            Rank::Min => 0,
            Rank::Median => cardinality / 2,
            Rank::Max => cardinality - 1,
        }
    }
}

/// Rank filter over a `(2·radius_x + 1) × (2·radius_y + 1)` window.
///
/// Tiles carry a halo of one radius, so windows of interior pixels are read
/// from the tile's own bounds. Reads beyond the source go through `padder`,
/// which makes the result independent of the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOp {
    pub rank: Rank,
    pub radius_x: usize,
    pub radius_y: usize,
    pub padder: Padder,
}

impl RankOp {
    pub fn new(rank: Rank, radius_x: usize, radius_y: usize, padder: Padder) -> Self {
        Self {
            rank,
            radius_x,
            radius_y,
            padder,
        }
    }

    pub fn median(radius: usize) -> Self {
        Self::new(Rank::Median, radius, radius, Padder::ExtendedBorder)
    }

    pub fn cardinality(&self) -> usize {
        (2 * self.radius_x + 1) * (2 * self.radius_y + 1)
    }
}

impl TileOp for RankOp {
    fn layout(&self) -> TileLayout {
        TileLayout::Padded {
            pad_x: self.radius_x,
            pad_y: self.radius_y,
        }
    }

    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        let (rx, ry) = (self.radius_x as i64, self.radius_y as i64);
        let readable = tile.bounds;
        let rank = self.rank.index(self.cardinality());
        let mut window = Vec::with_capacity(self.cardinality());

        for loc in RasterScanner::samples(tile.writable_absolute(), src.bands()) {
            window.clear();
            let (col, row) = (loc.col as i64, loc.row as i64);
            for y in row - ry..=row + ry {
                for x in col - rx..=col + rx {
                    let inside = x >= 0
                        && y >= 0
                        && readable.contains(x as usize, y as usize);
                    window.push(if inside {
                        src.sample(x as usize, y as usize, loc.band)
                    } else {
                        self.padder.sample(src, x, y, loc.band)
                    });
                }
            }
            let (_, &mut value, _) = window.select_nth_unstable(rank);
            out.set_sample(loc.col, loc.row, loc.band, value);
        }
        Ok(())
    }
}
