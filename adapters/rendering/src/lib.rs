#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless rendering adapters for CrashNet.
//!
//! [`RecordingSink`] captures every draw call for inspection and
//! [`TextFrame`] rasterises a room into one character per tile so headless
//! sessions can print what the room looks like.

use std::{error::Error, fmt};

use crashnet_core::{AssetId, Color, ColorGrid, DrawCall, RenderSink, Vec2};

/// Glyph used for cells nothing was drawn into.
pub const EMPTY_GLYPH: char = ' ';

const BRIGHT_LUMINANCE: u32 = 0x80;

/// Background composite captured by a [`RecordingSink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeRecord {
    /// Width of the composited image in pixels.
    pub width: u32,
    /// Height of the composited image in pixels.
    pub height: u32,
    /// Top-left corner the image was drawn at.
    pub position: Vec2,
}

/// Render sink that stores every request it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    calls: Vec<DrawCall>,
    composites: Vec<CompositeRecord>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprite draw calls in submission order.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Background composites in submission order.
    #[must_use]
    pub fn composites(&self) -> &[CompositeRecord] {
        &self.composites
    }

    /// Sprite draw calls that used `asset`.
    pub fn calls_for(&self, asset: AssetId) -> impl Iterator<Item = &DrawCall> + '_ {
        self.calls
            .iter()
            .filter(move |call| call.image.asset() == asset)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.composites.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }

    fn draw_composite(&mut self, pixels: &ColorGrid, position: Vec2) {
        self.composites.push(CompositeRecord {
            width: pixels.width(),
            height: pixels.height(),
            position,
        });
    }
}

/// Character-cell frame with one glyph per room tile.
///
/// Backgrounds are shaded by sampling the centre pixel of every cell: bright
/// pixels become `#`, dark ones `.` and transparent ones stay blank. Sprites
/// overwrite the cell containing their centre.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    columns: u32,
    rows: u32,
    cell_size: u32,
    glyphs: Vec<char>,
}

impl TextFrame {
    /// Creates a blank frame of `columns` by `rows` cells of `cell_size` pixels.
    pub fn new(columns: u32, rows: u32, cell_size: u32) -> Result<Self, RenderingError> {
        if cell_size == 0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            columns,
            rows,
            cell_size,
            glyphs: vec![EMPTY_GLYPH; (columns * rows) as usize],
        })
    }

    /// Number of cells per line.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of lines.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Glyph stored at the provided cell, if the cell lies inside the frame.
    #[must_use]
    pub fn glyph(&self, column: u32, row: u32) -> Option<char> {
        if column < self.columns && row < self.rows {
            self.glyphs.get((row * self.columns + column) as usize).copied()
        } else {
            None
        }
    }

    /// Resets every cell to [`EMPTY_GLYPH`].
    pub fn clear(&mut self) {
        self.glyphs.fill(EMPTY_GLYPH);
    }

    fn cell_at(&self, point: Vec2) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let size = self.cell_size as f32;
        let column = (point.x / size) as u32;
        let row = (point.y / size) as u32;
        (column < self.columns && row < self.rows).then(|| (row * self.columns + column) as usize)
    }
}

impl RenderSink for TextFrame {
    fn draw(&mut self, call: DrawCall) {
        let Some(glyph) = sprite_glyph(call.image.asset()) else {
            return;
        };
        if let Some(index) = self.cell_at(call.position) {
            self.glyphs[index] = glyph;
        }
    }

    fn draw_composite(&mut self, pixels: &ColorGrid, position: Vec2) {
        let half = self.cell_size / 2;
        for row in 0..self.rows {
            for column in 0..self.columns {
                let sample_x = (column * self.cell_size + half) as f32 - position.x;
                let sample_y = (row * self.cell_size + half) as f32 - position.y;
                if sample_x < 0.0 || sample_y < 0.0 {
                    continue;
                }
                let (x, y) = (sample_x as u32, sample_y as u32);
                if x < pixels.width() && y < pixels.height() {
                    let index = (row * self.columns + column) as usize;
                    self.glyphs[index] = shade(pixels.get(x, y));
                }
            }
        }
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.glyphs.chunks(self.columns.max(1) as usize).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let text: String = line.iter().collect();
            f.write_str(text.trim_end())?;
        }
        Ok(())
    }
}

fn sprite_glyph(asset: AssetId) -> Option<char> {
    match asset {
        AssetId::PlayerOne => Some('1'),
        AssetId::PlayerTwo => Some('2'),
        AssetId::Enemy => Some('E'),
        AssetId::Projectile => Some('*'),
        AssetId::Tile(_) | AssetId::Blank => None,
    }
}

fn shade(color: Color) -> char {
    if color.alpha() == 0 {
        return EMPTY_GLYPH;
    }
    let luminance = (299 * u32::from(color.red())
        + 587 * u32::from(color.green())
        + 114 * u32::from(color.blue()))
        / 1000;
    if luminance >= BRIGHT_LUMINANCE {
        '#'
    } else {
        '.'
    }
}

/// Errors that can occur when constructing rendering targets.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Cells must span at least one pixel.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use crashnet_core::ImageHandle;

    use super::*;

    #[test]
    fn frame_creation_rejects_zero_sized_cells_without_panicking() {
        assert_eq!(
            TextFrame::new(4, 4, 0),
            Err(RenderingError::InvalidCellSize { cell_size: 0 })
        );
    }

    #[test]
    fn composite_is_shaded_by_brightness() {
        let mut frame = TextFrame::new(2, 1, 4).expect("positive cell size");
        let pixels = ColorGrid::from_fn(8, 4, |x, _| {
            if x < 4 {
                Color::from_rgb(0x10, 0x10, 0x10)
            } else {
                Color::WHITE
            }
        });
        frame.draw_composite(&pixels, Vec2::ZERO);
        assert_eq!(frame.to_string(), ".#");
    }

    #[test]
    fn sprites_land_in_the_cell_holding_their_centre() {
        let mut frame = TextFrame::new(3, 2, 10).expect("positive cell size");
        frame.draw(DrawCall::new(
            ImageHandle::new(AssetId::Enemy, 8, 8),
            Vec2::new(25.0, 15.0),
        ));
        frame.draw(DrawCall::new(
            ImageHandle::new(AssetId::Blank, 1, 1),
            Vec2::new(5.0, 5.0),
        ));
        frame.draw(DrawCall::new(
            ImageHandle::new(AssetId::PlayerOne, 8, 8),
            Vec2::new(95.0, 5.0),
        ));
        assert_eq!(frame.glyph(2, 1), Some('E'));
        assert_eq!(frame.glyph(0, 0), Some(EMPTY_GLYPH));
        assert_eq!(frame.to_string(), "\n  E");
    }

    #[test]
    fn recording_sink_keeps_submission_order() {
        let mut sink = RecordingSink::new();
        sink.draw_composite(&ColorGrid::filled(4, 2, Color::WHITE), Vec2::ZERO);
        sink.draw(DrawCall::new(
            ImageHandle::new(AssetId::PlayerTwo, 8, 8),
            Vec2::new(1.0, 2.0),
        ));
        sink.draw(DrawCall::new(
            ImageHandle::new(AssetId::Projectile, 2, 2),
            Vec2::new(3.0, 4.0),
        ));

        assert_eq!(sink.composites()[0].width, 4);
        assert_eq!(sink.calls().len(), 2);
        assert_eq!(sink.calls_for(AssetId::Projectile).count(), 1);

        sink.clear();
        assert!(sink.calls().is_empty());
        assert!(sink.composites().is_empty());
    }
}
