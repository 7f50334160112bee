//! Draw surface contract shared by the simulation and rendering adapters.

use glam::Vec2;

use crate::{Color, ColorGrid, ImageHandle};

/// Request to draw a single texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// Texture to draw.
    pub image: ImageHandle,
    /// Room-space location of the texture origin.
    pub position: Vec2,
    /// Clockwise rotation in radians around `origin`.
    pub rotation: f32,
    /// Pivot inside the texture, in texture pixels.
    pub origin: Vec2,
    /// Colour multiplied into the texture.
    pub tint: Color,
    /// Uniform scale factor.
    pub scale: f32,
}

impl DrawCall {
    /// Draws `image` unrotated with its top-left corner at `position`.
    #[must_use]
    pub const fn new(image: ImageHandle, position: Vec2) -> Self {
        Self {
            image,
            position,
            rotation: 0.0,
            origin: Vec2::ZERO,
            tint: Color::WHITE,
            scale: 1.0,
        }
    }

    /// Returns the call rotated by `rotation` around `origin`.
    #[must_use]
    pub fn rotated(mut self, rotation: f32, origin: Vec2) -> Self {
        self.rotation = rotation;
        self.origin = origin;
        self
    }
}

/// Surface that accepts sprite draws and composited pixel blocks.
pub trait RenderSink {
    /// Draws a single texture.
    fn draw(&mut self, call: DrawCall);

    /// Blits a composited pixel block with its top-left corner at `position`.
    fn draw_composite(&mut self, pixels: &ColorGrid, position: Vec2);
}
