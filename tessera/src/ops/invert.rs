use crate::error::Result;
use crate::raster::{Image, Raster, RasterScanner, TileWriter};
use crate::tiler::Tile;

use super::TileOp;

/// Photometric inversion, `max − sample` in every band.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvertOp;

impl TileOp for InvertOp {
    fn filter_tile(&self, src: &Image, tile: &Tile, out: &mut TileWriter<'_>) -> Result<()> {
        for loc in RasterScanner::samples(tile.writable_absolute(), src.bands()) {
            let max = src.max_value(loc.band);
            out.set_sample(
                loc.col,
                loc.row,
                loc.band,
                max - src.sample(loc.col, loc.row, loc.band),
            );
        }
        Ok(())
    }
}
