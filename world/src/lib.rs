#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room simulation state for CrashNet.
//!
//! The world owns a grid of rooms of which exactly one is active. Adapters
//! and systems mutate it through [`apply`], advance it through [`update`] and
//! read it through the [`query`] module.

mod background;
mod entity;
mod generation;
mod leave;
mod room;
mod tiles;

use std::time::Duration;

use crashnet_core::{
    AssetLookup, Command, Direction, EffectFactory, Event, InputSnapshot, RenderSink, RoomCoord,
    Vec2,
};
use log::{debug, info, warn};

pub use background::Background;
pub use entity::{resolve_collision, Bindings, Contact, GameObject, Motion, ObjectContact, Spawner};
pub use generation::{exits_for, RoomPlan, WorldNumber, WorldRecipe};
pub use leave::LeaveTracker;
pub use room::Room;
pub use tiles::{Tile, TileGrid};

/// Collaborators and timing shared by every object during one tick.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    /// Simulated time covered by the tick.
    pub elapsed: Duration,
    /// Keyboard and pointer state sampled for the tick.
    pub input: &'a dyn InputSnapshot,
    /// Source of cosmetic emitters for newly fired projectiles.
    pub effects: &'a dyn EffectFactory,
}

/// Represents the authoritative CrashNet world state.
#[derive(Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    rooms: Vec<Room>,
    active: RoomCoord,
    padding: f32,
    spawner: Spawner,
}

impl World {
    /// Generates every room described by `recipe` and activates the centre one.
    ///
    /// # Panics
    ///
    /// Panics when the recipe describes an empty world or empty rooms.
    #[must_use]
    pub fn new(recipe: &WorldRecipe, assets: &dyn AssetLookup) -> Self {
        assert!(
            recipe.columns > 0 && recipe.rows > 0,
            "world must contain at least one room"
        );

        let mut rooms = Vec::with_capacity((recipe.columns * recipe.rows) as usize);
        for row in 0..recipe.rows {
            for column in 0..recipe.columns {
                let coord = RoomCoord::new(column, row);
                let grid = TileGrid::from_layout(&recipe.room_layout(coord), recipe.tile_size);
                let exits = exits_for(coord, recipe.columns, recipe.rows);
                rooms.push(Room::new(coord, grid, exits));
            }
        }
        debug!(
            "generated {}x{} rooms of {}x{} tiles",
            recipe.columns, recipe.rows, recipe.room_columns, recipe.room_rows
        );

        Self {
            columns: recipe.columns,
            rows: recipe.rows,
            rooms,
            active: recipe.start_room(),
            padding: recipe.entrance_padding,
            spawner: Spawner::new(assets),
        }
    }

    /// Coordinate of the room reached by leaving the active room through `direction`.
    ///
    /// # Panics
    ///
    /// Panics when no room exists in that direction.
    #[must_use]
    pub fn next_room(&self, direction: Direction) -> RoomCoord {
        let (dx, dy) = direction.components();
        let column = self.active.column().checked_add_signed(dx);
        let row = self.active.row().checked_add_signed(dy);
        match (column, row) {
            (Some(column), Some(row)) if column < self.columns && row < self.rows => {
                RoomCoord::new(column, row)
            }
            _ => panic!("no room {direction:?} of {:?}", self.active),
        }
    }

    /// Position `object` takes after entering a room through `direction`.
    ///
    /// The object's box is mirrored across the room on each moved axis, then
    /// nudged inward by the entrance padding. With a padding of at least one
    /// tile the centre lands off the outermost tiles, so the object does not
    /// register on the edge it entered through.
    #[must_use]
    pub fn next_start_position(&self, object: &GameObject, direction: Direction) -> Vec2 {
        let room = self.active_room().grid().bounds();
        let size = object.bounds();
        let (dx, dy) = direction.components();
        let mut position = object.position();
        if dx != 0 {
            position.x = mirror(
                position.x,
                size.width() as f32,
                room.width() as f32,
                self.padding,
            );
        }
        if dy != 0 {
            position.y = mirror(
                position.y,
                size.height() as f32,
                room.height() as f32,
                self.padding,
            );
        }
        position
    }

    fn index(&self, coord: RoomCoord) -> usize {
        (coord.row() * self.columns + coord.column()) as usize
    }

    fn active_room(&self) -> &Room {
        &self.rooms[self.index(self.active)]
    }

    fn active_room_mut(&mut self) -> &mut Room {
        let index = self.index(self.active);
        &mut self.rooms[index]
    }

    fn spawn(&mut self, object: GameObject, out_events: &mut Vec<Event>) {
        let (id, kind) = (object.id(), object.kind());
        debug!("spawned {kind:?} {id:?} in {:?}", self.active);
        self.active_room_mut().insert(object);
        out_events.push(Event::ObjectSpawned {
            object: id,
            kind,
            room: self.active,
        });
    }

    fn transition(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.active;
        let to = self.next_room(direction);
        let destination = self.index(to);

        let players = self.active_room_mut().leave();
        let count = players.len();
        for mut player in players {
            let start = self.next_start_position(&player, direction);
            player.set_position(start);
            self.rooms[destination].insert(player);
        }
        self.active = to;

        info!("{count} players left {from:?} through {direction:?} into {to:?}");
        out_events.push(Event::RoomChanged {
            from,
            to,
            direction,
        });
    }
}

fn mirror(start: f32, size: f32, extent: f32, padding: f32) -> f32 {
    let mirrored = extent - start - size;
    if mirrored + size / 2.0 < extent / 2.0 {
        mirrored + padding
    } else {
        mirrored - padding
    }
}

/// Applies the provided command to the active room.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let room = world.active;
    match command {
        Command::SpawnPlayer { player, position } => {
            let object = world.spawner.player(player, position);
            world.spawn(object, out_events);
        }
        Command::SpawnEnemy { position } => {
            let object = world.spawner.enemy(position);
            world.spawn(object, out_events);
        }
        Command::RemoveObject { object } => {
            if world.active_room_mut().remove(object).is_some() {
                debug!("removed {object:?} from {room:?}");
                out_events.push(Event::ObjectRemoved { object, room });
            }
        }
        Command::PaintTile { column, row, tile } => {
            let target = world.active_room_mut();
            if target.grid().contains(column, row) {
                target.set_tile(column, row, tile);
                out_events.push(Event::TilePainted {
                    room,
                    column,
                    row,
                    tile,
                });
            } else {
                out_events.push(Event::TileRejected { column, row });
            }
        }
        Command::LoadLayout { layout } => match world.active_room_mut().load_layout(&layout) {
            Ok(()) => out_events.push(Event::LayoutLoaded { room }),
            Err(error) => {
                warn!("layout rejected for {room:?}: {error}");
                out_events.push(Event::LayoutRejected { error });
            }
        },
    }
}

/// Runs one simulation tick over the active room and performs any room change.
pub fn update(world: &mut World, context: &TickContext<'_>, out_events: &mut Vec<Event>) {
    out_events.push(Event::TimeAdvanced {
        dt: context.elapsed,
    });

    let index = world.index(world.active);
    world.rooms[index].update(context, &mut world.spawner, out_events);

    if let Some(direction) = world.rooms[index].should_leave() {
        world.transition(direction, out_events);
    }
}

/// Repaints the active room's stale background and draws it with its objects.
pub fn draw(world: &mut World, assets: &dyn AssetLookup, sink: &mut dyn RenderSink) {
    world.active_room_mut().draw(assets, sink);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use crashnet_core::{ObjectId, RoomCoord, TileLayout};

    use super::{GameObject, Room, World};

    /// Coordinate of the room the players are in.
    #[must_use]
    pub fn active_coord(world: &World) -> RoomCoord {
        world.active
    }

    /// Room the players are in.
    #[must_use]
    pub fn active_room(world: &World) -> &Room {
        world.active_room()
    }

    /// Room at `coord`, if it lies inside the world.
    #[must_use]
    pub fn room(world: &World, coord: RoomCoord) -> Option<&Room> {
        if coord.column() < world.columns && coord.row() < world.rows {
            world.rooms.get(world.index(coord))
        } else {
            None
        }
    }

    /// Number of room columns and rows in the world.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Distance entering objects are nudged away from the edge they cross.
    #[must_use]
    pub fn entrance_padding(world: &World) -> f32 {
        world.padding
    }

    /// Object with the provided identifier in any room.
    #[must_use]
    pub fn object(world: &World, id: ObjectId) -> Option<&GameObject> {
        world.rooms.iter().find_map(|room| room.object(id))
    }

    /// Snapshot of the active room's tiles in the persisted layout form.
    #[must_use]
    pub fn layout(world: &World) -> TileLayout {
        world.active_room().to_layout()
    }
}

#[cfg(test)]
mod tests {
    use crashnet_core::{AssetRegistry, LayoutError, ObjectId, PlayerNumber, TileLayout, TileType};

    use super::*;

    fn small_world() -> World {
        let recipe = WorldRecipe {
            room_columns: 10,
            room_rows: 8,
            ..WorldRecipe::default()
        };
        World::new(&recipe, &AssetRegistry::placeholder(32))
    }

    #[test]
    fn starts_in_the_centre_room() {
        let world = small_world();
        assert_eq!(query::active_coord(&world), RoomCoord::new(2, 2));
        assert_eq!(query::dimensions(&world), (5, 5));
        assert_eq!(query::active_room(&world).exits().len(), 4);
        assert!(query::room(&world, RoomCoord::new(5, 0)).is_none());
        let corner = query::room(&world, RoomCoord::new(0, 4)).expect("corner room");
        assert_eq!(corner.exits().len(), 2);
    }

    #[test]
    fn next_room_follows_the_direction_vector() {
        let world = small_world();
        assert_eq!(world.next_room(Direction::East), RoomCoord::new(3, 2));
        assert_eq!(world.next_room(Direction::North), RoomCoord::new(2, 1));
        assert_eq!(world.next_room(Direction::SouthWest), RoomCoord::new(1, 3));
    }

    #[test]
    #[should_panic(expected = "no room")]
    fn next_room_outside_the_world_panics() {
        let recipe = WorldRecipe {
            columns: 1,
            rows: 1,
            ..WorldRecipe::default()
        };
        let world = World::new(&recipe, &AssetRegistry::placeholder(32));
        let _ = world.next_room(Direction::West);
    }

    #[test]
    fn start_positions_mirror_and_pad() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPlayer {
                player: PlayerNumber::One,
                position: Vec2::new(290.0, 10.0),
            },
            &mut events,
        );
        let player = query::object(&world, ObjectId::new(0)).expect("spawned");

        let east = world.next_start_position(player, Direction::East);
        assert_eq!(east, Vec2::new(38.0, 10.0));

        let north = world.next_start_position(player, Direction::North);
        assert_eq!(north, Vec2::new(290.0, 190.0));

        let diagonal = world.next_start_position(player, Direction::NorthEast);
        assert_eq!(diagonal, Vec2::new(38.0, 190.0));

        let room = query::active_room(&world);
        let half = Vec2::splat(12.0);
        assert_eq!(room.edge_at(east + half).components().0, 0);
        assert_eq!(room.edge_at(north + half).components().1, 0);
        assert_eq!(room.edge_at(diagonal + half), Direction::None);
    }

    #[test]
    fn paint_commands_outside_the_grid_are_rejected() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PaintTile {
                column: 3,
                row: 4,
                tile: TileType::Wall,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PaintTile {
                column: 10,
                row: 0,
                tile: TileType::Wall,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TilePainted {
                    room: RoomCoord::new(2, 2),
                    column: 3,
                    row: 4,
                    tile: TileType::Wall,
                },
                Event::TileRejected { column: 10, row: 0 },
            ]
        );
        assert_eq!(query::layout(&world).get(3, 4), TileType::Wall);
    }

    #[test]
    fn layouts_with_other_dimensions_are_rejected() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadLayout {
                layout: TileLayout::filled(3, 3, TileType::Wall),
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::LayoutRejected {
                error: LayoutError::DimensionMismatch { .. }
            }]
        ));
        assert_eq!(query::layout(&world), TileLayout::filled(10, 8, TileType::Ground));
    }

    #[test]
    fn removal_reports_only_known_objects() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: Vec2::new(64.0, 64.0),
            },
            &mut events,
        );
        let object = ObjectId::new(0);
        apply(&mut world, Command::RemoveObject { object }, &mut events);
        apply(&mut world, Command::RemoveObject { object }, &mut events);

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            Event::ObjectRemoved {
                object,
                room: RoomCoord::new(2, 2),
            }
        );
        assert!(query::object(&world, object).is_none());
    }
}
