//! Asset lookup contracts consumed by the simulation and its renderers.

use serde::{Deserialize, Serialize};

use crate::TileType;

/// Identifier of a texture known to the asset registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetId {
    /// Texture used for a tile of the provided type.
    Tile(TileType),
    /// Idle sprite of the first player.
    PlayerOne,
    /// Idle sprite of the second player.
    PlayerTwo,
    /// Sprite shared by enemies.
    Enemy,
    /// Sprite shared by projectiles.
    Projectile,
    /// Single transparent pixel.
    Blank,
}

impl AssetId {
    /// Every asset identifier, in registry order.
    pub const ALL: [AssetId; 7] = [
        AssetId::Tile(TileType::Ground),
        AssetId::Tile(TileType::Wall),
        AssetId::PlayerOne,
        AssetId::PlayerTwo,
        AssetId::Enemy,
        AssetId::Projectile,
        AssetId::Blank,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Tile(TileType::Ground) => 0,
            Self::Tile(TileType::Wall) => 1,
            Self::PlayerOne => 2,
            Self::PlayerTwo => 3,
            Self::Enemy => 4,
            Self::Projectile => 5,
            Self::Blank => 6,
        }
    }
}

/// RGBA colour with byte channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_rgba(0, 0, 0, 0);
    /// Opaque white, the neutral sprite tint.
    pub const WHITE: Self = Self::from_rgb(0xff, 0xff, 0xff);

    /// Creates an opaque colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 0xff)
    }

    /// Creates a colour from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the colour.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}

/// Dense two-dimensional pixel array stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ColorGrid {
    /// Creates a grid filled with a single colour.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Creates a grid by evaluating `color_at(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn<F>(width: u32, height: u32, mut color_at: F) -> Self
    where
        F: FnMut(u32, u32) -> Color,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(color_at(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Width of the grid in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Colour stored at the provided pixel.
    ///
    /// # Panics
    ///
    /// Panics when the pixel lies outside the grid.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Colour at the provided pixel, wrapping coordinates around the grid.
    ///
    /// # Panics
    ///
    /// Panics when the grid has no pixels.
    #[must_use]
    pub fn sample_wrapped(&self, x: u32, y: u32) -> Color {
        assert!(self.width > 0 && self.height > 0, "cannot sample an empty grid");
        self.get(x % self.width, y % self.height)
    }

    /// Overwrites the colour stored at the provided pixel.
    ///
    /// # Panics
    ///
    /// Panics when the pixel lies outside the grid.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Row-major view over every pixel.
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

/// Opaque reference to a loaded texture and its dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    asset: AssetId,
    width: u32,
    height: u32,
}

impl ImageHandle {
    /// Creates a handle describing a texture of the provided size.
    #[must_use]
    pub const fn new(asset: AssetId, width: u32, height: u32) -> Self {
        Self {
            asset,
            width,
            height,
        }
    }

    /// Asset the handle refers to.
    #[must_use]
    pub const fn asset(&self) -> AssetId {
        self.asset
    }

    /// Width of the texture in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the texture in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Read-only access to loaded textures and their pixel data.
pub trait AssetLookup {
    /// Handle for the texture registered under `asset`.
    fn texture(&self, asset: AssetId) -> ImageHandle;

    /// Pixel colours of the texture registered under `asset`.
    ///
    /// Used for compositing room backgrounds, never for hit testing.
    fn color_grid(&self, asset: AssetId) -> &ColorGrid;
}

/// In-memory registry holding one texture per [`AssetId`].
#[derive(Clone, Debug)]
pub struct AssetRegistry {
    grids: Vec<ColorGrid>,
}

impl AssetRegistry {
    /// Builds a registry by producing the pixel data for every asset.
    #[must_use]
    pub fn from_fn<F>(mut load: F) -> Self
    where
        F: FnMut(AssetId) -> ColorGrid,
    {
        Self {
            grids: AssetId::ALL.iter().map(|asset| load(*asset)).collect(),
        }
    }

    /// Registry of flat-coloured placeholder textures.
    ///
    /// Tiles are `tile_size` squares; walls carry a one pixel darker rim so
    /// composited backgrounds show the grid.
    #[must_use]
    pub fn placeholder(tile_size: u32) -> Self {
        Self::from_fn(|asset| match asset {
            AssetId::Tile(TileType::Ground) => {
                ColorGrid::filled(tile_size, tile_size, Color::from_rgb(0x3a, 0x3a, 0x40))
            }
            AssetId::Tile(TileType::Wall) => ColorGrid::from_fn(tile_size, tile_size, |x, y| {
                let rim = x == 0 || y == 0 || x + 1 == tile_size || y + 1 == tile_size;
                if rim {
                    Color::from_rgb(0x70, 0x70, 0x78)
                } else {
                    Color::from_rgb(0x9a, 0x9a, 0xa4)
                }
            }),
            AssetId::PlayerOne => ColorGrid::filled(24, 24, Color::from_rgb(0x2f, 0x95, 0x32)),
            AssetId::PlayerTwo => ColorGrid::filled(24, 24, Color::from_rgb(0x58, 0x47, 0xff)),
            AssetId::Enemy => ColorGrid::filled(24, 24, Color::from_rgb(0xc8, 0x2a, 0x36)),
            AssetId::Projectile => ColorGrid::filled(8, 8, Color::from_rgb(0xff, 0xc1, 0x07)),
            AssetId::Blank => ColorGrid::filled(1, 1, Color::TRANSPARENT),
        })
    }
}

impl AssetLookup for AssetRegistry {
    fn texture(&self, asset: AssetId) -> ImageHandle {
        let grid = &self.grids[asset.index()];
        ImageHandle::new(asset, grid.width(), grid.height())
    }

    fn color_grid(&self, asset: AssetId) -> &ColorGrid {
        &self.grids[asset.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_index_matches_declaration_order() {
        for (position, asset) in AssetId::ALL.iter().enumerate() {
            assert_eq!(asset.index(), position);
        }
    }

    #[test]
    fn texture_dimensions_follow_pixel_data() {
        let registry = AssetRegistry::placeholder(16);
        let wall = registry.texture(AssetId::Tile(TileType::Wall));
        assert_eq!((wall.width(), wall.height()), (16, 16));
        assert_eq!(wall.asset(), AssetId::Tile(TileType::Wall));

        let projectile = registry.texture(AssetId::Projectile);
        assert_eq!((projectile.width(), projectile.height()), (8, 8));
    }

    #[test]
    fn wrapped_sampling_repeats_the_grid() {
        let grid = ColorGrid::from_fn(2, 2, |x, y| Color::from_rgb(x as u8, y as u8, 0));
        assert_eq!(grid.sample_wrapped(3, 4), Color::from_rgb(1, 0, 0));
        assert_eq!(grid.sample_wrapped(2, 3), grid.get(0, 1));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_range_pixel_panics() {
        let grid = ColorGrid::filled(2, 2, Color::WHITE);
        let _ = grid.get(2, 0);
    }
}
