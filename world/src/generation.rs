use std::collections::BTreeSet;

use crashnet_core::{Direction, RoomCoord, TileLayout, TileType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_ROOM_COLUMNS: u32 = 25;
const DEFAULT_ROOM_ROWS: u32 = 19;
const DEFAULT_TILE_SIZE: u32 = 32;
const DOOR_HALF_WIDTH: u32 = 1;
const ROOM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Predefined world sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldNumber {
    /// Five by five rooms.
    #[default]
    One,
    /// Seven by seven rooms.
    Two,
    /// Nine by nine rooms.
    Three,
    /// Eleven by eleven rooms.
    Four,
}

impl WorldNumber {
    /// Number of rooms along each side of the world.
    #[must_use]
    pub const fn side(self) -> u32 {
        match self {
            Self::One => 5,
            Self::Two => 7,
            Self::Three => 9,
            Self::Four => 11,
        }
    }
}

/// How the tiles of each generated room are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoomPlan {
    /// Every tile is ground.
    #[default]
    Open,
    /// Perimeter walls with doors on exit sides plus scattered pillars.
    Walled {
        /// Seed mixed with each room coordinate to place pillars.
        seed: u64,
        /// Number of pillar placements attempted per room.
        pillars: u32,
    },
}

/// Parameters used to build a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRecipe {
    /// Rooms along the horizontal axis.
    pub columns: u32,
    /// Rooms along the vertical axis.
    pub rows: u32,
    /// Tiles along the horizontal axis of every room.
    pub room_columns: u32,
    /// Tiles along the vertical axis of every room.
    pub room_rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: u32,
    /// Distance entering objects are nudged away from the edge they enter by.
    pub entrance_padding: f32,
    /// Tile layout applied to every room.
    pub plan: RoomPlan,
}

impl WorldRecipe {
    /// Recipe for one of the predefined world sizes with open rooms.
    #[must_use]
    pub const fn for_world(number: WorldNumber) -> Self {
        Self {
            columns: number.side(),
            rows: number.side(),
            room_columns: DEFAULT_ROOM_COLUMNS,
            room_rows: DEFAULT_ROOM_ROWS,
            tile_size: DEFAULT_TILE_SIZE,
            entrance_padding: DEFAULT_TILE_SIZE as f32,
            plan: RoomPlan::Open,
        }
    }

    /// Returns the recipe using `plan` for every room.
    #[must_use]
    pub const fn with_plan(mut self, plan: RoomPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Room the players start in: the centre of the world.
    #[must_use]
    pub const fn start_room(&self) -> RoomCoord {
        RoomCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Tile layout of the room at `coord`.
    #[must_use]
    pub fn room_layout(&self, coord: RoomCoord) -> TileLayout {
        let (columns, rows) = (self.room_columns, self.room_rows);
        match self.plan {
            RoomPlan::Open => TileLayout::filled(columns, rows, TileType::Ground),
            RoomPlan::Walled { seed, pillars } => {
                let exits = exits_for(coord, self.columns, self.rows);
                let pillars = pillar_cells(columns, rows, room_seed(seed, coord), pillars);
                TileLayout::from_fn(columns, rows, |column, row| {
                    if pillars.contains(&(column, row))
                        || is_closed_perimeter(column, row, columns, rows, &exits)
                    {
                        TileType::Wall
                    } else {
                        TileType::Ground
                    }
                })
            }
        }
    }
}

impl Default for WorldRecipe {
    fn default() -> Self {
        Self::for_world(WorldNumber::default())
    }
}

/// Cardinal edges of the room at `coord` that lead to a neighbouring room.
#[must_use]
pub fn exits_for(coord: RoomCoord, columns: u32, rows: u32) -> BTreeSet<Direction> {
    let mut exits = BTreeSet::new();
    if coord.column() != 0 {
        let _ = exits.insert(Direction::West);
    }
    if coord.column() + 1 != columns {
        let _ = exits.insert(Direction::East);
    }
    if coord.row() != 0 {
        let _ = exits.insert(Direction::North);
    }
    if coord.row() + 1 != rows {
        let _ = exits.insert(Direction::South);
    }
    exits
}

fn is_closed_perimeter(
    column: u32,
    row: u32,
    columns: u32,
    rows: u32,
    exits: &BTreeSet<Direction>,
) -> bool {
    let west = column == 0;
    let east = column + 1 == columns;
    let north = row == 0;
    let south = row + 1 == rows;
    if !(west || east || north || south) {
        return false;
    }
    let corner = (west || east) && (north || south);
    if corner {
        return true;
    }

    let in_door = |position: u32, length: u32| position.abs_diff(length / 2) <= DOOR_HALF_WIDTH;
    let door = (north && exits.contains(&Direction::North) && in_door(column, columns))
        || (south && exits.contains(&Direction::South) && in_door(column, columns))
        || (west && exits.contains(&Direction::West) && in_door(row, rows))
        || (east && exits.contains(&Direction::East) && in_door(row, rows));
    !door
}

fn room_seed(seed: u64, coord: RoomCoord) -> u64 {
    let salt = (u64::from(coord.column()) << 32) | u64::from(coord.row());
    seed ^ salt.wrapping_add(1).wrapping_mul(ROOM_SALT)
}

fn pillar_cells(columns: u32, rows: u32, seed: u64, attempts: u32) -> BTreeSet<(u32, u32)> {
    let mut cells = BTreeSet::new();
    if columns < 5 || rows < 5 {
        return cells;
    }
    let (mid_column, mid_row) = (columns / 2, rows / 2);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..attempts {
        let column = rng.gen_range(2..columns - 2);
        let row = rng.gen_range(2..rows - 2);
        let blocks_centre = column.abs_diff(mid_column) <= 1 && row.abs_diff(mid_row) <= 1;
        if !blocks_centre {
            let _ = cells.insert((column, row));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_worlds_are_square() {
        assert_eq!(WorldRecipe::for_world(WorldNumber::One).columns, 5);
        assert_eq!(WorldRecipe::for_world(WorldNumber::Two).rows, 7);
        assert_eq!(WorldRecipe::for_world(WorldNumber::Three).columns, 9);
        assert_eq!(WorldRecipe::for_world(WorldNumber::Four).rows, 11);
        assert_eq!(WorldRecipe::default().start_room(), RoomCoord::new(2, 2));
    }

    #[test]
    fn exits_only_lead_to_existing_rooms() {
        let corner = exits_for(RoomCoord::new(0, 0), 5, 5);
        assert_eq!(
            corner,
            [Direction::East, Direction::South].into_iter().collect()
        );

        let far_corner = exits_for(RoomCoord::new(4, 4), 5, 5);
        assert_eq!(
            far_corner,
            [Direction::West, Direction::North].into_iter().collect()
        );

        let centre = exits_for(RoomCoord::new(2, 2), 5, 5);
        assert_eq!(centre.len(), 4);
        assert!(centre.iter().all(|direction| !direction.is_horizontal()
            || !direction.is_vertical()));
    }

    #[test]
    fn single_room_world_has_no_exits() {
        assert!(exits_for(RoomCoord::new(0, 0), 1, 1).is_empty());
    }

    #[test]
    fn walled_rooms_open_doors_on_exit_sides_only() {
        let recipe = WorldRecipe::default().with_plan(RoomPlan::Walled {
            seed: 7,
            pillars: 0,
        });
        let layout = recipe.room_layout(RoomCoord::new(0, 0));
        let (columns, rows) = (layout.columns(), layout.rows());

        assert_eq!(layout.get(columns - 1, rows / 2), TileType::Ground);
        assert_eq!(layout.get(columns / 2, rows - 1), TileType::Ground);
        assert_eq!(layout.get(0, rows / 2), TileType::Wall);
        assert_eq!(layout.get(columns / 2, 0), TileType::Wall);
        assert_eq!(layout.get(columns - 1, rows / 2 + 2), TileType::Wall);
        assert_eq!(layout.get(0, 0), TileType::Wall);
        assert_eq!(layout.get(columns / 2, rows / 2), TileType::Ground);
    }

    #[test]
    fn pillars_are_deterministic_per_seed_and_room() {
        let recipe = WorldRecipe::default().with_plan(RoomPlan::Walled {
            seed: 99,
            pillars: 12,
        });
        let first = recipe.room_layout(RoomCoord::new(1, 3));
        let second = recipe.room_layout(RoomCoord::new(1, 3));
        assert_eq!(first, second);

        let (columns, rows) = (first.columns(), first.rows());
        let interior_walls = first
            .iter()
            .filter(|(column, row, tile)| {
                *column > 0 && *row > 0 && *column + 1 < columns && *row + 1 < rows && tile.is_wall()
            })
            .count();
        assert!(interior_walls <= 12);
        assert_eq!(first.get(columns / 2, rows / 2), TileType::Ground);
    }
}
