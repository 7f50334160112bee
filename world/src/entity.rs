use std::{collections::BTreeSet, f64::consts::TAU, time::Duration};

use crashnet_core::{
    intersection_depth, AssetId, AssetLookup, Axis, BoundingBox, Direction, DrawCall,
    EffectEmitter, EffectFactory, EffectKind, InputSnapshot, Key, ObjectId, ObjectKind,
    PlayerNumber, RenderSink, Vec2,
};
use log::trace;

use crate::tiles::TileGrid;

const ENEMY_HIT_POINTS: u32 = 3;
const PROJECTILE_LAUNCH_SPEED: f32 = 10.0;

/// Movement limits applied to a game object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Largest speed reachable on each axis, in pixels per tick.
    pub max_velocity: Vec2,
    /// Speed gained per tick while moving.
    pub acceleration: Vec2,
    /// Speed lost per tick while idle.
    pub deceleration: Vec2,
    /// Largest rotation applied per tick, in radians.
    pub rotation_speed: f64,
}

impl Motion {
    /// Limits used by player characters.
    pub const PLAYER: Self = Self {
        max_velocity: Vec2::new(6.0, 6.0),
        acceleration: Vec2::new(1.0, 1.0),
        deceleration: Vec2::new(1.0, 1.0),
        rotation_speed: std::f64::consts::FRAC_PI_8,
    };

    /// Limits used by enemies.
    pub const ENEMY: Self = Self {
        max_velocity: Vec2::new(4.0, 4.0),
        acceleration: Vec2::new(0.5, 0.5),
        deceleration: Vec2::new(0.5, 0.5),
        rotation_speed: std::f64::consts::FRAC_PI_8 / 2.0,
    };

    /// Limits used by projectiles, which keep their launch velocity.
    pub const PROJECTILE: Self = Self {
        max_velocity: Vec2::new(20.0, 20.0),
        acceleration: Vec2::ZERO,
        deceleration: Vec2::ZERO,
        rotation_speed: 0.0,
    };
}

/// What a game object touched during the collision pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    /// A wall tile.
    Wall(BoundingBox),
    /// The room boundary, which moved the object back inside by this offset.
    Boundary(Vec2),
    /// Another game object.
    Object(ObjectContact),
}

/// Description of another object involved in a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectContact {
    /// Identifier of the other object.
    pub id: ObjectId,
    /// Behaviour tag of the other object.
    pub kind: ObjectKind,
    /// Object that fired the other object, for projectiles.
    pub owner: Option<ObjectId>,
    /// Whether the other object deals damage on contact.
    pub armed: bool,
}

#[derive(Debug)]
struct Enemy {
    hit_points: u32,
    struck_by: BTreeSet<ObjectId>,
}

impl Enemy {
    fn strike(&mut self, projectile: ObjectId) {
        if self.struck_by.insert(projectile) {
            self.hit_points = self.hit_points.saturating_sub(1);
        }
    }
}

#[derive(Debug)]
struct Projectile {
    owner: ObjectId,
    collided: bool,
    fresh_impact: bool,
    launch: Box<dyn EffectEmitter>,
    trail: Box<dyn EffectEmitter>,
    impact: Box<dyn EffectEmitter>,
}

impl Projectile {
    fn new(owner: ObjectId, effects: &dyn EffectFactory) -> Self {
        Self {
            owner,
            collided: false,
            fresh_impact: false,
            launch: effects.emitter(EffectKind::Launch),
            trail: effects.emitter(EffectKind::Trail),
            impact: effects.emitter(EffectKind::Impact),
        }
    }

    fn emitters(&self) -> [&dyn EffectEmitter; 3] {
        [&*self.launch, &*self.trail, &*self.impact]
    }

    fn emitters_mut(&mut self) -> [&mut Box<dyn EffectEmitter>; 3] {
        [&mut self.launch, &mut self.trail, &mut self.impact]
    }

    fn fire(&mut self, location: Vec2) {
        for emitter in self.emitters_mut() {
            emitter.set_location(location);
        }
        self.launch.start();
        self.trail.start();
    }

    fn ignores(&self, other: &ObjectContact) -> bool {
        other.id == self.owner || other.owner == Some(self.owner)
    }

    fn on_collision(&mut self) {
        if self.collided {
            return;
        }
        self.collided = true;
        self.fresh_impact = true;
        self.trail.stop();
        self.impact.start();
    }

    fn armed(&self) -> bool {
        !self.collided || self.fresh_impact
    }

    fn is_alive(&self) -> bool {
        !self.collided || self.emitters().iter().any(|emitter| emitter.is_alive())
    }
}

#[derive(Debug)]
enum Behaviour {
    Player(PlayerNumber),
    Enemy(Enemy),
    Projectile(Projectile),
}

/// Keyboard layout driving a player character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bindings {
    /// Keys mapped to the direction they move the character in.
    pub movement: [(Key, Direction); 4],
    /// Key that fires a projectile.
    pub fire: Key,
}

impl Bindings {
    /// Bindings for the provided seat.
    #[must_use]
    pub const fn for_player(player: PlayerNumber) -> Self {
        match player {
            PlayerNumber::One => Self {
                movement: [
                    (Key::Up, Direction::North),
                    (Key::Right, Direction::East),
                    (Key::Down, Direction::South),
                    (Key::Left, Direction::West),
                ],
                fire: Key::Space,
            },
            PlayerNumber::Two => Self {
                movement: [
                    (Key::W, Direction::North),
                    (Key::D, Direction::East),
                    (Key::S, Direction::South),
                    (Key::A, Direction::West),
                ],
                fire: Key::F,
            },
        }
    }

    /// Direction requested by the movement keys currently held.
    #[must_use]
    pub fn direction(&self, input: &dyn InputSnapshot) -> Direction {
        let held: Vec<Direction> = self
            .movement
            .iter()
            .filter(|(key, _)| input.is_key_down(*key))
            .map(|(_, direction)| *direction)
            .collect();
        Direction::combine(&held)
    }
}

/// Everything an object may consult or produce while updating.
pub(crate) struct UpdateContext<'a> {
    pub(crate) elapsed: Duration,
    pub(crate) input: &'a dyn InputSnapshot,
    pub(crate) effects: &'a dyn EffectFactory,
    pub(crate) grid: &'a TileGrid,
    pub(crate) spawner: &'a mut Spawner,
    pub(crate) spawned: &'a mut Vec<GameObject>,
}

/// Movable, collidable entity living inside a room.
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    behaviour: Behaviour,
    position: Vec2,
    origin: Vec2,
    velocity: Vec2,
    motion: Motion,
    rotation: f64,
    rotation_remaining: f64,
    bounds: BoundingBox,
    updates: u64,
}

impl GameObject {
    fn new(
        id: ObjectId,
        behaviour: Behaviour,
        position: Vec2,
        size: (u32, u32),
        motion: Motion,
    ) -> Self {
        let (width, height) = size;
        Self {
            id,
            behaviour,
            position,
            origin: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
            velocity: Vec2::ZERO,
            motion,
            rotation: 0.0,
            rotation_remaining: 0.0,
            bounds: BoundingBox::at(position, width, height),
            updates: 0,
        }
    }

    /// Identifier of the object.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Behaviour tag of the object.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match &self.behaviour {
            Behaviour::Player(player) => ObjectKind::Player(*player),
            Behaviour::Enemy(_) => ObjectKind::Enemy,
            Behaviour::Projectile(_) => ObjectKind::Projectile,
        }
    }

    /// Top-left corner of the object in room pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Render pivot relative to the top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Current velocity in pixels per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Movement limits of the object.
    #[must_use]
    pub const fn motion(&self) -> Motion {
        self.motion
    }

    /// Facing in radians, clockwise from North, within `[0, 2π)`.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation still to be applied before the facing reaches its target.
    #[must_use]
    pub const fn rotation_remaining(&self) -> f64 {
        self.rotation_remaining
    }

    /// Bounding box mirroring the object's position.
    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Center of the bounding box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Number of ticks the object has been updated.
    #[must_use]
    pub const fn updates(&self) -> u64 {
        self.updates
    }

    /// Remaining hit points, for enemies.
    #[must_use]
    pub fn hit_points(&self) -> Option<u32> {
        match &self.behaviour {
            Behaviour::Enemy(enemy) => Some(enemy.hit_points),
            _ => None,
        }
    }

    /// Object that fired this one, for projectiles.
    #[must_use]
    pub fn owner(&self) -> Option<ObjectId> {
        match &self.behaviour {
            Behaviour::Projectile(projectile) => Some(projectile.owner),
            _ => None,
        }
    }

    /// Reports whether the object is a projectile that already hit something.
    #[must_use]
    pub fn has_collided(&self) -> bool {
        matches!(&self.behaviour, Behaviour::Projectile(projectile) if projectile.collided)
    }

    /// Reports whether the object should stay in its room.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match &self.behaviour {
            Behaviour::Player(_) => true,
            Behaviour::Enemy(enemy) => enemy.hit_points > 0,
            Behaviour::Projectile(projectile) => projectile.is_alive(),
        }
    }

    /// Describes the object for another object's collision hook.
    #[must_use]
    pub fn as_contact(&self) -> ObjectContact {
        let (owner, armed) = match &self.behaviour {
            Behaviour::Projectile(projectile) => (Some(projectile.owner), projectile.armed()),
            _ => (None, false),
        };
        ObjectContact {
            id: self.id,
            kind: self.kind(),
            owner,
            armed,
        }
    }

    /// Moves the object, keeping its bounding box in step.
    pub fn set_position(&mut self, position: Vec2) {
        debug_assert!(position.is_finite(), "object position must be finite");
        self.position = position;
        self.bounds = self.bounds.with_position(position);
    }

    /// Accelerates toward `direction`, or slows down when it is `None`.
    ///
    /// The facing eases toward the direction's angle while the velocity
    /// change is derived from the target angle straight away. The result is
    /// clamped to the maximum velocity on each axis.
    pub fn move_toward(&mut self, direction: Direction) {
        if direction == Direction::None {
            self.decelerate();
            return;
        }

        let angle = direction.to_radians();
        self.rotate_to(angle);

        let delta = Vec2::new(
            round_micro(f64::from(self.motion.acceleration.x) * angle.sin()),
            round_micro(-f64::from(self.motion.acceleration.y) * angle.cos()),
        );
        self.set_velocity(self.velocity + delta);
    }

    /// Stores the shortest signed turn toward `target` as the outstanding rotation.
    pub fn rotate_to(&mut self, target: f64) {
        let direct = wrap_angle(target) - self.rotation;
        let around = if direct > 0.0 {
            direct - TAU
        } else {
            direct + TAU
        };
        self.rotation_remaining = if direct.abs() <= around.abs() {
            direct
        } else {
            around
        };
    }

    /// Applies one tick of the outstanding rotation.
    pub fn rotate(&mut self) {
        if self.rotation_remaining == 0.0 {
            return;
        }
        if self.rotation_remaining.abs() <= self.motion.rotation_speed {
            self.rotation = wrap_angle(self.rotation + self.rotation_remaining);
            self.rotation_remaining = 0.0;
        } else {
            let step = self.motion.rotation_speed.copysign(self.rotation_remaining);
            self.rotation = wrap_angle(self.rotation + step);
            self.rotation_remaining -= step;
        }
    }

    /// Advances one tick of movement against the walls of `grid`.
    ///
    /// The horizontal component is applied and resolved before the vertical
    /// one so that diagonal movement cannot slip through wall corners.
    pub fn step(&mut self, grid: &TileGrid) {
        self.rotate();
        self.set_position(self.position + Vec2::new(self.velocity.x, 0.0));
        self.push_out_of_walls(grid, Axis::Horizontal);
        self.set_position(self.position + Vec2::new(0.0, self.velocity.y));
        self.push_out_of_walls(grid, Axis::Vertical);
    }

    /// Overlap between this object and `other`, empty when they do not touch.
    #[must_use]
    pub fn collision_with(&self, other: &GameObject) -> BoundingBox {
        self.bounds.intersect(&other.bounds)
    }

    /// Reports whether this object overlaps `other`.
    #[must_use]
    pub fn should_collide(&self, other: &GameObject) -> bool {
        !self.collision_with(other).is_empty()
    }

    /// Reacts to touching something over `region`.
    ///
    /// Wall contacts push the object out of the wall and boundary contacts
    /// apply their displacement. Projectiles switch to their impact effect and
    /// halt; enemies lose a hit point to every armed projectile that reaches
    /// them.
    pub fn collide(&mut self, contact: Contact, region: BoundingBox) {
        match (&mut self.behaviour, &contact) {
            (Behaviour::Projectile(projectile), Contact::Object(other))
                if projectile.ignores(other) =>
            {
                return;
            }
            (Behaviour::Projectile(projectile), _) => {
                projectile.on_collision();
                self.velocity = Vec2::ZERO;
            }
            (Behaviour::Enemy(enemy), Contact::Object(other))
                if other.kind == ObjectKind::Projectile && other.armed =>
            {
                enemy.strike(other.id);
            }
            _ => {}
        }

        match contact {
            Contact::Wall(wall) => {
                let push = resolve_collision(&wall, &region);
                self.set_position(self.position + push);
            }
            Contact::Boundary(displacement) => self.set_position(self.position + displacement),
            Contact::Object(_) => {}
        }
    }

    pub(crate) fn update(&mut self, context: &mut UpdateContext<'_>) {
        self.updates += 1;
        match self.kind() {
            ObjectKind::Player(player) => self.update_player(player, context),
            ObjectKind::Enemy => {
                self.move_toward(Direction::None);
                self.step(context.grid);
            }
            ObjectKind::Projectile => self.update_projectile(context),
        }
    }

    pub(crate) fn draw(&self, assets: &dyn AssetLookup, sink: &mut dyn RenderSink) {
        if let Behaviour::Projectile(projectile) = &self.behaviour {
            for emitter in projectile.emitters() {
                emitter.draw(sink);
            }
        }
        let image = assets.texture(self.kind().asset());
        sink.draw(
            DrawCall::new(image, self.position + self.origin)
                .rotated(self.rotation as f32, self.origin),
        );
    }

    fn update_player(&mut self, player: PlayerNumber, context: &mut UpdateContext<'_>) {
        let bindings = Bindings::for_player(player);
        self.move_toward(bindings.direction(context.input));
        self.step(context.grid);

        if context.input.was_key_pressed(bindings.fire) {
            let projectile = context.spawner.projectile(self, context.effects);
            trace!("{:?} fired {:?}", self.id, projectile.id());
            context.spawned.push(projectile);
        }
    }

    fn update_projectile(&mut self, context: &mut UpdateContext<'_>) {
        let collided = match &mut self.behaviour {
            Behaviour::Projectile(projectile) => {
                projectile.fresh_impact = false;
                projectile.collided
            }
            _ => return,
        };

        if !collided {
            self.set_position(self.position + self.velocity);
            let walls: Vec<BoundingBox> = context
                .grid
                .intersecting_walls(&self.bounds)
                .into_iter()
                .map(|tile| tile.bounds())
                .collect();
            for wall in walls {
                let region = self.bounds.intersect(&wall);
                if !region.is_empty() {
                    self.collide(Contact::Wall(wall), region);
                }
            }
        }

        let center = self.center();
        if let Behaviour::Projectile(projectile) = &mut self.behaviour {
            for emitter in projectile.emitters_mut() {
                emitter.set_location(center);
                emitter.update(context.elapsed);
            }
        }
    }

    fn push_out_of_walls(&mut self, grid: &TileGrid, axis: Axis) {
        let walls: Vec<BoundingBox> = grid
            .intersecting_walls(&self.bounds)
            .into_iter()
            .map(|tile| tile.bounds())
            .collect();
        for wall in walls {
            if self.bounds.intersect(&wall).is_empty() {
                continue;
            }
            let depth = intersection_depth(axis, &self.bounds, &wall);
            let push = match axis {
                Axis::Horizontal => Vec2::new(depth, 0.0),
                Axis::Vertical => Vec2::new(0.0, depth),
            };
            self.set_position(self.position + push);
        }
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        let max = self.motion.max_velocity;
        self.velocity = Vec2::new(
            velocity.x.clamp(-max.x, max.x),
            velocity.y.clamp(-max.y, max.y),
        );
    }

    fn decelerate(&mut self) {
        let rate = self.motion.deceleration;
        self.velocity = Vec2::new(
            toward_zero(self.velocity.x, rate.x),
            toward_zero(self.velocity.y, rate.y),
        );
    }
}

/// Correction that moves an object out of `wall` given their overlap `region`.
///
/// On each axis the object is pushed by the overlap extent, toward the side
/// of the wall's midpoint the overlap starts on. Only the axis with the
/// shallower overlap is corrected; equal overlaps correct both axes.
#[must_use]
pub fn resolve_collision(wall: &BoundingBox, region: &BoundingBox) -> Vec2 {
    if region.is_empty() {
        return Vec2::ZERO;
    }
    let width = region.width() as f32;
    let height = region.height() as f32;
    let mid_x = wall.x() as f32 + wall.width() as f32 / 2.0;
    let mid_y = wall.y() as f32 + wall.height() as f32 / 2.0;

    let push_x = if region.x() as f32 >= mid_x { width } else { -width };
    let push_y = if region.y() as f32 >= mid_y { height } else { -height };

    match region.width().cmp(&region.height()) {
        std::cmp::Ordering::Less => Vec2::new(push_x, 0.0),
        std::cmp::Ordering::Greater => Vec2::new(0.0, push_y),
        std::cmp::Ordering::Equal => Vec2::new(push_x, push_y),
    }
}

/// Creates game objects with unique identifiers and sprite-sized bounds.
#[derive(Clone, Debug)]
pub struct Spawner {
    next_id: u32,
    player_one: (u32, u32),
    player_two: (u32, u32),
    enemy: (u32, u32),
    projectile: (u32, u32),
}

impl Spawner {
    /// Creates a spawner sizing objects after their sprites in `assets`.
    #[must_use]
    pub fn new(assets: &dyn AssetLookup) -> Self {
        let size = |asset: AssetId| {
            let image = assets.texture(asset);
            (image.width(), image.height())
        };
        Self {
            next_id: 0,
            player_one: size(AssetId::PlayerOne),
            player_two: size(AssetId::PlayerTwo),
            enemy: size(AssetId::Enemy),
            projectile: size(AssetId::Projectile),
        }
    }

    /// Creates a player character with its top-left corner at `position`.
    pub fn player(&mut self, player: PlayerNumber, position: Vec2) -> GameObject {
        let size = match player {
            PlayerNumber::One => self.player_one,
            PlayerNumber::Two => self.player_two,
        };
        GameObject::new(
            self.allocate(),
            Behaviour::Player(player),
            position,
            size,
            Motion::PLAYER,
        )
    }

    /// Creates an enemy with its top-left corner at `position`.
    pub fn enemy(&mut self, position: Vec2) -> GameObject {
        let enemy = Enemy {
            hit_points: ENEMY_HIT_POINTS,
            struck_by: BTreeSet::new(),
        };
        GameObject::new(
            self.allocate(),
            Behaviour::Enemy(enemy),
            position,
            self.enemy,
            Motion::ENEMY,
        )
    }

    /// Creates a projectile leaving the center of `shooter` along its facing.
    pub(crate) fn projectile(
        &mut self,
        shooter: &GameObject,
        effects: &dyn EffectFactory,
    ) -> GameObject {
        let (width, height) = self.projectile;
        let half = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        let mut projectile = GameObject::new(
            self.allocate(),
            Behaviour::Projectile(Projectile::new(shooter.id, effects)),
            shooter.center() - half,
            self.projectile,
            Motion::PROJECTILE,
        );

        let heading = shooter.rotation;
        projectile.rotation = heading;
        projectile.set_velocity(Vec2::new(
            round_micro(f64::from(PROJECTILE_LAUNCH_SPEED) * heading.sin()),
            round_micro(-f64::from(PROJECTILE_LAUNCH_SPEED) * heading.cos()),
        ));
        let center = projectile.center();
        if let Behaviour::Projectile(state) = &mut projectile.behaviour {
            state.fire(center);
        }
        projectile
    }

    fn allocate(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn round_micro(value: f64) -> f32 {
    ((value * 1_000_000.0).round() / 1_000_000.0) as f32
}

fn toward_zero(value: f32, rate: f32) -> f32 {
    if value > 0.0 {
        (value - rate).max(0.0)
    } else if value < 0.0 {
        (value + rate).min(0.0)
    } else {
        0.0
    }
}
