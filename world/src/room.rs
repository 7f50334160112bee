use std::collections::BTreeSet;

use crashnet_core::{
    AssetLookup, BoundingBox, Direction, Event, LayoutError, ObjectId, RenderSink, RoomCoord,
    TileLayout, TileType, Vec2,
};
use log::{debug, trace};

use crate::{
    background::Background,
    entity::{Contact, GameObject, ObjectContact, Spawner, UpdateContext},
    leave::LeaveTracker,
    tiles::{Tile, TileGrid},
    TickContext,
};

#[derive(Debug)]
enum PendingOp {
    Add(GameObject),
    Remove(ObjectId),
}

/// Grid of tiles plus the objects currently inside it.
#[derive(Debug)]
pub struct Room {
    coord: RoomCoord,
    grid: TileGrid,
    exits: BTreeSet<Direction>,
    objects: Vec<GameObject>,
    pending: Vec<PendingOp>,
    tracker: LeaveTracker,
    background: Background,
}

impl Room {
    /// Creates an empty room over `grid` that may be left through `exits`.
    #[must_use]
    pub fn new(coord: RoomCoord, grid: TileGrid, exits: BTreeSet<Direction>) -> Self {
        let background = Background::new(grid.bounds());
        Self {
            coord,
            grid,
            exits,
            objects: Vec::new(),
            pending: Vec::new(),
            tracker: LeaveTracker::new(),
            background,
        }
    }

    /// Location of the room in the world grid.
    #[must_use]
    pub const fn coord(&self) -> RoomCoord {
        self.coord
    }

    /// Tile grid of the room.
    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Edges through which players may leave the room.
    #[must_use]
    pub const fn exits(&self) -> &BTreeSet<Direction> {
        &self.exits
    }

    /// Live objects in update order.
    #[must_use]
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Live object with the provided identifier.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    /// Edge registrations of the room's objects.
    #[must_use]
    pub const fn tracker(&self) -> &LeaveTracker {
        &self.tracker
    }

    /// Composite background of the room.
    #[must_use]
    pub const fn background(&self) -> &Background {
        &self.background
    }

    /// Tile stored at the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the room.
    #[must_use]
    pub fn tile(&self, column: u32, row: u32) -> &Tile {
        self.grid.tile(column, row)
    }

    /// Replaces the tile at the provided cell and marks its pixels stale.
    ///
    /// # Panics
    ///
    /// Panics when the cell lies outside the room.
    pub fn set_tile(&mut self, column: u32, row: u32, kind: TileType) {
        let footprint = self.grid.replace(column, row, kind);
        self.background.invalidate(footprint);
        debug!("{:?}: tile ({column}, {row}) set to {kind}", self.coord);
    }

    /// Replaces every tile with the contents of `layout`.
    ///
    /// Nothing changes when the layout does not match the room's grid.
    pub fn load_layout(&mut self, layout: &TileLayout) -> Result<(), LayoutError> {
        layout.expect_dimensions(self.grid.columns(), self.grid.rows())?;
        for (column, row, kind) in layout.iter() {
            let _ = self.grid.replace(column, row, kind);
        }
        self.background.invalidate(self.grid.bounds());
        debug!("{:?}: layout loaded", self.coord);
        Ok(())
    }

    /// Snapshot of the room's tiles in the persisted layout form.
    #[must_use]
    pub fn to_layout(&self) -> TileLayout {
        self.grid.to_layout()
    }

    /// Wall tiles touched by `bounds`.
    #[must_use]
    pub fn intersecting_walls(&self, bounds: &BoundingBox) -> Vec<&Tile> {
        self.grid.intersecting_walls(bounds)
    }

    /// Adds an object between ticks.
    pub fn insert(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    /// Removes an object between ticks.
    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|object| object.id() == id)?;
        self.tracker.clear(id);
        Some(self.objects.remove(index))
    }

    /// Runs one simulation tick over the room.
    ///
    /// Objects created or removed while the tick runs are buffered and only
    /// join or leave the room once every object has been visited.
    pub fn update(
        &mut self,
        context: &TickContext<'_>,
        spawner: &mut Spawner,
        events: &mut Vec<Event>,
    ) {
        self.grid.update();

        let mut spawned = Vec::new();
        for index in 0..self.objects.len() {
            if !self.objects[index].is_alive() {
                self.pending.push(PendingOp::Remove(self.objects[index].id()));
                continue;
            }

            let mut update = UpdateContext {
                elapsed: context.elapsed,
                input: context.input,
                effects: context.effects,
                grid: &self.grid,
                spawner: &mut *spawner,
                spawned: &mut spawned,
            };
            self.objects[index].update(&mut update);

            self.keep_in_bounds(index);
            self.track_edge(index);
            self.collide_with_others(index);
        }
        trace!("{:?}: updated {} objects", self.coord, self.objects.len());

        self.pending.extend(spawned.into_iter().map(PendingOp::Add));
        self.flush(events);
    }

    /// Edge through which every player in the room wants to leave, if any.
    #[must_use]
    pub fn should_leave(&self) -> Option<Direction> {
        let players: BTreeSet<ObjectId> = self
            .objects
            .iter()
            .filter(|object| object.kind().is_player())
            .map(GameObject::id)
            .collect();
        self.tracker.quorum(&players, &self.exits)
    }

    /// Clears edge tracking and hands every player over to the caller.
    pub fn leave(&mut self) -> Vec<GameObject> {
        self.tracker.reset();
        let (players, others): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|object| object.kind().is_player());
        self.objects = others;
        players
    }

    /// Edge of the room whose outermost tiles contain `point`.
    ///
    /// Corner cells report the diagonal; interior points report `None`.
    #[must_use]
    pub fn edge_at(&self, point: Vec2) -> Direction {
        let size = self.grid.tile_size() as f32;
        let column = (point.x / size).floor();
        let row = (point.y / size).floor();
        let last_column = (self.grid.columns() - 1) as f32;
        let last_row = (self.grid.rows() - 1) as f32;

        let dx = if column <= 0.0 {
            -1
        } else if column >= last_column {
            1
        } else {
            0
        };
        let dy = if row <= 0.0 {
            -1
        } else if row >= last_row {
            1
        } else {
            0
        };
        Direction::from_components(dx, dy)
    }

    /// Reports whether the background has stale pixels.
    #[must_use]
    pub const fn should_render(&self) -> bool {
        self.background.should_render()
    }

    /// Repaints the stale part of the background.
    pub fn render(&mut self, assets: &dyn AssetLookup) {
        self.background.render(&self.grid, assets);
    }

    pub(crate) fn draw(&mut self, assets: &dyn AssetLookup, sink: &mut dyn RenderSink) {
        self.render(assets);
        if let Some(pixels) = self.background.pixels() {
            sink.draw_composite(pixels, Vec2::ZERO);
        }
        for object in &self.objects {
            object.draw(assets, sink);
        }
    }

    fn keep_in_bounds(&mut self, index: usize) {
        let room = self.grid.bounds();
        let object = &mut self.objects[index];
        let bounds = object.bounds();
        let dx = shift_inside(bounds.left(), bounds.width(), room.width());
        let dy = shift_inside(bounds.top(), bounds.height(), room.height());
        if dx == 0 && dy == 0 {
            return;
        }

        let moved = bounds.offset(dx, dy);
        let horizontal = match dx.signum() {
            1 => BoundingBox::new(bounds.left(), bounds.top(), dx.unsigned_abs(), bounds.height()),
            -1 => BoundingBox::new(moved.right(), bounds.top(), dx.unsigned_abs(), bounds.height()),
            _ => BoundingBox::EMPTY,
        };
        let vertical = match dy.signum() {
            1 => BoundingBox::new(moved.left(), bounds.top(), bounds.width(), dy.unsigned_abs()),
            -1 => BoundingBox::new(moved.left(), moved.bottom(), bounds.width(), dy.unsigned_abs()),
            _ => BoundingBox::EMPTY,
        };
        let displacement = Vec2::new(dx as f32, dy as f32);
        object.collide(Contact::Boundary(displacement), horizontal.union(&vertical));
    }

    fn track_edge(&mut self, index: usize) {
        let object = &self.objects[index];
        let id = object.id();
        match self.edge_at(object.center()) {
            Direction::None => self.tracker.clear(id),
            direction => self.tracker.set(id, direction),
        }
    }

    fn collide_with_others(&mut self, index: usize) {
        let visitor = &self.objects[index];
        let contacts: Vec<(ObjectContact, BoundingBox)> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(other_index, other)| *other_index != index && other.is_alive())
            .filter_map(|(_, other)| {
                let region = visitor.collision_with(other);
                (!region.is_empty()).then(|| (other.as_contact(), region))
            })
            .collect();

        let visitor = &mut self.objects[index];
        for (contact, region) in contacts {
            visitor.collide(Contact::Object(contact), region);
        }
    }

    fn flush(&mut self, events: &mut Vec<Event>) {
        let mut removals = Vec::new();
        for op in std::mem::take(&mut self.pending) {
            match op {
                PendingOp::Add(object) => {
                    debug!("{:?}: {:?} {:?} joined", self.coord, object.kind(), object.id());
                    events.push(Event::ObjectSpawned {
                        object: object.id(),
                        kind: object.kind(),
                        room: self.coord,
                    });
                    self.objects.push(object);
                }
                PendingOp::Remove(id) => removals.push(id),
            }
        }

        for id in removals {
            if self.remove(id).is_some() {
                debug!("{:?}: {id:?} removed", self.coord);
                events.push(Event::ObjectRemoved {
                    object: id,
                    room: self.coord,
                });
            }
        }
    }
}

/// Offset along one axis that brings `[start, start + size)` inside `[0, extent)`.
fn shift_inside(start: i32, size: u32, extent: u32) -> i32 {
    let last = extent.saturating_sub(size) as i32;
    start.clamp(0, last) - start
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crashnet_core::{AssetRegistry, InputState, PlayerNumber, TimedEffects};

    use super::*;

    fn open_room(columns: u32, rows: u32) -> Room {
        let exits = Direction::CARDINAL.into_iter().collect();
        Room::new(RoomCoord::new(0, 0), TileGrid::new(columns, rows, 32), exits)
    }

    fn tick(room: &mut Room, spawner: &mut Spawner, input: &InputState) -> Vec<Event> {
        let effects = TimedEffects::default();
        let context = TickContext {
            elapsed: Duration::from_millis(16),
            input,
            effects: &effects,
        };
        let mut events = Vec::new();
        room.update(&context, spawner, &mut events);
        events
    }

    #[test]
    fn edges_follow_the_center_cell() {
        let room = open_room(10, 8);
        assert_eq!(room.edge_at(Vec2::new(5.0, 100.0)), Direction::West);
        assert_eq!(room.edge_at(Vec2::new(300.0, 100.0)), Direction::East);
        assert_eq!(room.edge_at(Vec2::new(100.0, 250.0)), Direction::South);
        assert_eq!(room.edge_at(Vec2::new(310.0, 2.0)), Direction::NorthEast);
        assert_eq!(room.edge_at(Vec2::new(100.0, 100.0)), Direction::None);
    }

    #[test]
    fn boundary_pushes_objects_back_inside() {
        let assets = AssetRegistry::placeholder(32);
        let mut spawner = Spawner::new(&assets);
        let mut room = open_room(10, 8);
        let player = spawner.player(PlayerNumber::One, Vec2::new(-5.0, 236.0));
        let id = player.id();
        room.insert(player);

        let _ = tick(&mut room, &mut spawner, &InputState::new());

        let bounds = room.object(id).expect("player stays").bounds();
        assert!(room.grid().bounds().contains(&bounds), "{bounds:?}");
        assert_eq!(bounds.left(), 0);
        assert_eq!(bounds.bottom(), 256);
        assert_eq!(room.tracker().direction_of(id), Some(Direction::SouthWest));
    }

    #[test]
    fn objects_fully_outside_are_clamped_to_the_nearest_inside_position() {
        let assets = AssetRegistry::placeholder(32);
        let mut spawner = Spawner::new(&assets);
        let mut room = open_room(10, 8);
        let west = spawner.enemy(Vec2::new(-100.0, 100.0));
        let south_east = spawner.enemy(Vec2::new(400.0, 400.0));
        let ids = [west.id(), south_east.id()];
        room.insert(west);
        room.insert(south_east);

        let _ = tick(&mut room, &mut spawner, &InputState::new());

        let position = |id| room.object(id).expect("enemy stays").position();
        assert_eq!(position(ids[0]), Vec2::new(0.0, 100.0));
        assert_eq!(position(ids[1]), Vec2::new(296.0, 232.0));
        assert_eq!(room.tracker().direction_of(ids[0]), Some(Direction::West));
    }

    #[test]
    fn remove_takes_objects_out_between_ticks() {
        let assets = AssetRegistry::placeholder(32);
        let mut spawner = Spawner::new(&assets);
        let mut room = open_room(10, 8);
        let player = spawner.player(PlayerNumber::One, Vec2::new(100.0, 100.0));
        let enemy = spawner.enemy(Vec2::new(200.0, 100.0));
        let enemy_id = enemy.id();
        room.insert(player);
        room.insert(enemy);

        let removed = room.remove(enemy_id).map(|object| object.id());
        assert_eq!(removed, Some(enemy_id));
        assert_eq!(room.objects().len(), 1);
        assert!(room.remove(enemy_id).is_none());
    }

    #[test]
    fn leave_strips_players_only() {
        let assets = AssetRegistry::placeholder(32);
        let mut spawner = Spawner::new(&assets);
        let mut room = open_room(10, 8);
        room.insert(spawner.player(PlayerNumber::One, Vec2::new(100.0, 100.0)));
        room.insert(spawner.enemy(Vec2::new(150.0, 100.0)));
        room.insert(spawner.player(PlayerNumber::Two, Vec2::new(200.0, 100.0)));

        let players = room.leave();
        assert_eq!(players.len(), 2);
        assert!(players.iter().all(|object| object.kind().is_player()));
        assert_eq!(room.objects().len(), 1);
        assert_eq!(room.should_leave(), None);
    }

    #[test]
    fn mismatched_layout_is_rejected_without_changes() {
        let mut room = open_room(4, 3);
        let layout = TileLayout::filled(3, 3, TileType::Wall);
        assert!(matches!(
            room.load_layout(&layout),
            Err(LayoutError::DimensionMismatch { .. })
        ));
        assert_eq!(room.tile(0, 0).kind(), TileType::Ground);
    }
}
