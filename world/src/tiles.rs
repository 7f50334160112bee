use crashnet_core::{AssetId, BoundingBox, TileLayout, TileType, Vec2};

/// Single cell of a room's grid.
///
/// Tiles never move and are replaced wholesale when edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    kind: TileType,
    column: u32,
    row: u32,
    bounds: BoundingBox,
}

impl Tile {
    pub(crate) fn new(kind: TileType, column: u32, row: u32, tile_size: u32) -> Self {
        let bounds = BoundingBox::new(
            (column * tile_size) as i32,
            (row * tile_size) as i32,
            tile_size,
            tile_size,
        );
        Self {
            kind,
            column,
            row,
            bounds,
        }
    }

    /// Classification of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileType {
        self.kind
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel footprint of the tile inside its room.
    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Top-left corner of the tile in room pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.bounds.position()
    }

    /// Texture drawn for the tile.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        AssetId::Tile(self.kind)
    }

    /// Per-tick hook; tiles currently carry no behaviour.
    pub(crate) fn update(&mut self) {}
}

/// Fixed-size grid of square tiles stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid where every cell is ground.
    ///
    /// # Panics
    ///
    /// Panics when any dimension is zero.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_size: u32) -> Self {
        Self::from_layout(&TileLayout::filled(columns, rows, TileType::Ground), tile_size)
    }

    /// Creates a grid mirroring the provided layout.
    ///
    /// # Panics
    ///
    /// Panics when the layout or the tile size is empty.
    #[must_use]
    pub fn from_layout(layout: &TileLayout, tile_size: u32) -> Self {
        assert!(
            layout.columns() > 0 && layout.rows() > 0 && tile_size > 0,
            "tile grid dimensions must be non-zero"
        );
        let tiles = layout
            .iter()
            .map(|(column, row, kind)| Tile::new(kind, column, row, tile_size))
            .collect();
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            tile_size,
            tiles,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Width of the grid in pixels.
    #[must_use]
    pub const fn width_px(&self) -> u32 {
        self.columns * self.tile_size
    }

    /// Height of the grid in pixels.
    #[must_use]
    pub const fn height_px(&self) -> u32 {
        self.rows * self.tile_size
    }

    /// Pixel bounds of the whole grid.
    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        BoundingBox::new(0, 0, self.width_px(), self.height_px())
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, column: u32, row: u32) -> bool {
        column < self.columns && row < self.rows
    }

    /// Tile stored at the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the grid.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> &Tile {
        &self.tiles[self.index(column, row)]
    }

    /// Iterator over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Cell containing the provided pixel, if any.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<(u32, u32)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let size = self.tile_size as f32;
        let column = (point.x / size).floor() as u32;
        let row = (point.y / size).floor() as u32;
        self.contains(column, row).then_some((column, row))
    }

    /// Wall tiles touched by the provided box.
    ///
    /// The scan covers the starting cell of the box plus as many whole tiles
    /// as its offset within that cell and its size reach into. Cells outside
    /// the grid are skipped.
    #[must_use]
    pub fn intersecting_walls(&self, bounds: &BoundingBox) -> Vec<&Tile> {
        if bounds.is_empty() {
            return Vec::new();
        }
        let size = self.tile_size as i32;
        let first_column = bounds.x().div_euclid(size);
        let first_row = bounds.y().div_euclid(size);
        let column_span = (bounds.x().rem_euclid(size) + bounds.width() as i32) / size;
        let row_span = (bounds.y().rem_euclid(size) + bounds.height() as i32) / size;

        let mut walls = Vec::new();
        for row in first_row..=first_row + row_span {
            for column in first_column..=first_column + column_span {
                if column < 0 || row < 0 {
                    continue;
                }
                let (column, row) = (column as u32, row as u32);
                if !self.contains(column, row) {
                    continue;
                }
                let tile = self.tile(column, row);
                if tile.kind().is_wall() {
                    walls.push(tile);
                }
            }
        }
        walls
    }

    /// Snapshot of the grid in the persisted layout form.
    #[must_use]
    pub fn to_layout(&self) -> TileLayout {
        TileLayout::from_fn(self.columns, self.rows, |column, row| {
            self.tile(column, row).kind()
        })
    }

    /// Replaces a tile, returning the pixel footprint that changed.
    pub(crate) fn replace(&mut self, column: u32, row: u32, kind: TileType) -> BoundingBox {
        let index = self.index(column, row);
        let tile = Tile::new(kind, column, row, self.tile_size);
        self.tiles[index] = tile;
        tile.bounds()
    }

    pub(crate) fn update(&mut self) {
        for tile in &mut self.tiles {
            tile.update();
        }
    }

    fn index(&self, column: u32, row: u32) -> usize {
        assert!(
            self.contains(column, row),
            "tile ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        row as usize * self.columns as usize + column as usize
    }
}
