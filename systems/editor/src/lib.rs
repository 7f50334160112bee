#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure debug editor system that turns pointer input into room edit commands.
//!
//! Holding the left button paints walls under the pointer, holding the right
//! button paints ground and a middle click drops an enemy at the pointer.

use crashnet_core::{Command, Event, InputSnapshot, PointerButton, TileType, Vec2};

/// Tile dimensions of the room being edited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridShape {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: u32,
}

impl GridShape {
    /// Creates a new grid shape descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_size: u32) -> Self {
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Cell under `point`, if the point lies on the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<(u32, u32)> {
        if point.x < 0.0 || point.y < 0.0 || self.tile_size == 0 {
            return None;
        }
        let size = self.tile_size as f32;
        let column = (point.x / size) as u32;
        let row = (point.y / size) as u32;
        (column < self.columns && row < self.rows).then_some((column, row))
    }
}

/// Editor system that emits tile paint and enemy spawn commands.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    last_painted: Option<(u32, u32, TileType)>,
}

impl Editor {
    /// Creates a new editor system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_painted: None }
    }

    /// Consumes world events and the current input to emit editor commands.
    ///
    /// A held button repaints a cell only once until the pointer moves to
    /// another cell or the tile type changes.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &dyn InputSnapshot,
        shape: GridShape,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if matches!(
                event,
                Event::RoomChanged { .. } | Event::LayoutLoaded { .. }
            ) {
                self.last_painted = None;
            }
        }

        let pointer = input.pointer_position();
        let brush = if input.is_button_down(PointerButton::Left) {
            Some(TileType::Wall)
        } else if input.is_button_down(PointerButton::Right) {
            Some(TileType::Ground)
        } else {
            None
        };

        match (brush, shape.cell_at(pointer)) {
            (Some(tile), Some((column, row))) => {
                if self.last_painted != Some((column, row, tile)) {
                    self.last_painted = Some((column, row, tile));
                    out.push(Command::PaintTile { column, row, tile });
                }
            }
            (None, _) => self.last_painted = None,
            (Some(_), None) => {}
        }

        if input.was_button_pressed(PointerButton::Middle) && shape.cell_at(pointer).is_some() {
            out.push(Command::SpawnEnemy { position: pointer });
        }
    }
}
