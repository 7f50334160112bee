use crashnet_core::{AssetLookup, BoundingBox, Color, ColorGrid};
use log::trace;

use crate::tiles::TileGrid;

/// Composite image of a room's tiles, repainted only where it is stale.
#[derive(Clone, Debug)]
pub struct Background {
    bounds: BoundingBox,
    dirty: BoundingBox,
    pixels: Option<ColorGrid>,
}

impl Background {
    /// Creates a background covering `bounds`, entirely stale.
    #[must_use]
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            dirty: bounds,
            pixels: None,
        }
    }

    /// Smallest region known to need repainting.
    #[must_use]
    pub const fn dirty(&self) -> BoundingBox {
        self.dirty
    }

    /// Reports whether any part of the image is stale.
    #[must_use]
    pub const fn should_render(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Composited pixels, once the background has been rendered.
    #[must_use]
    pub fn pixels(&self) -> Option<&ColorGrid> {
        self.pixels.as_ref()
    }

    /// Grows the stale region to include `region`.
    pub fn invalidate(&mut self, region: BoundingBox) {
        self.dirty = self.dirty.union(&region.intersect(&self.bounds));
    }

    /// Repaints the stale region from each tile's colour grid.
    pub fn render(&mut self, grid: &TileGrid, assets: &dyn AssetLookup) {
        if !self.should_render() {
            return;
        }
        let (width, height) = (self.bounds.width(), self.bounds.height());
        let pixels = self
            .pixels
            .get_or_insert_with(|| ColorGrid::filled(width, height, Color::TRANSPARENT));

        let size = grid.tile_size();
        let dirty = self.dirty;
        for y in dirty.top()..dirty.bottom() {
            for x in dirty.left()..dirty.right() {
                let (x, y) = (x as u32, y as u32);
                let tile = grid.tile(x / size, y / size);
                let color = assets
                    .color_grid(tile.asset())
                    .sample_wrapped(x % size, y % size);
                pixels.set(x, y, color);
            }
        }
        trace!("repainted background region {dirty:?}");
        self.dirty = BoundingBox::EMPTY;
    }
}
