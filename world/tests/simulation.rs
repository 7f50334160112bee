use std::time::Duration;

use crashnet_core::{
    AssetRegistry, ColorGrid, Command, DrawCall, Event, InputFrame, InputState, Key, ObjectKind,
    PlayerNumber, RenderSink, TileLayout, TileType, TimedEffects, Vec2,
};
use crashnet_world::{self as world, query, RoomPlan, TickContext, World, WorldRecipe};

#[derive(Default)]
struct CountingSink {
    sprites: Vec<DrawCall>,
    composites: usize,
}

impl RenderSink for CountingSink {
    fn draw(&mut self, call: DrawCall) {
        self.sprites.push(call);
    }

    fn draw_composite(&mut self, _pixels: &ColorGrid, _position: Vec2) {
        self.composites += 1;
    }
}

fn build(plan: RoomPlan) -> (World, AssetRegistry) {
    let recipe = WorldRecipe::default().with_plan(plan);
    let assets = AssetRegistry::placeholder(recipe.tile_size);
    (World::new(&recipe, &assets), assets)
}

fn tick(world: &mut World, input: &InputState) -> Vec<Event> {
    let effects = TimedEffects::default();
    let context = TickContext {
        elapsed: Duration::from_millis(16),
        input,
        effects: &effects,
    };
    let mut events = Vec::new();
    world::update(world, &context, &mut events);
    events
}

#[test]
fn fired_projectiles_join_after_the_update_pass() {
    let (mut world, _) = build(RoomPlan::Open);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnPlayer {
            player: PlayerNumber::One,
            position: Vec2::new(400.0, 300.0),
        },
        &mut events,
    );

    let mut input = InputState::new();
    input.advance(InputFrame::new().with_key(Key::Space));
    let events = tick(&mut world, &input);

    let spawned: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::ObjectSpawned {
                object,
                kind: ObjectKind::Projectile,
                ..
            } => Some(*object),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    let projectile = spawned[0];
    let fresh = query::object(&world, projectile).expect("projectile joined");
    assert_eq!(fresh.updates(), 0);
    assert_eq!(fresh.position(), Vec2::new(408.0, 308.0));

    input.advance(InputFrame::new().with_key(Key::Space));
    let events = tick(&mut world, &input);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ObjectSpawned { .. })));

    let moved = query::object(&world, projectile).expect("projectile alive");
    assert_eq!(moved.updates(), 1);
    assert_eq!(moved.position(), Vec2::new(408.0, 298.0));
    assert!(!moved.has_collided());
}

#[test]
fn painted_tiles_stay_inside_the_dirty_region() {
    let (mut world, assets) = build(RoomPlan::Open);
    let mut sink = CountingSink::default();
    world::draw(&mut world, &assets, &mut sink);
    assert!(!query::active_room(&world).should_render());

    let mut events = Vec::new();
    for (column, row) in [(3, 4), (7, 2), (20, 15)] {
        world::apply(
            &mut world,
            Command::PaintTile {
                column,
                row,
                tile: TileType::Wall,
            },
            &mut events,
        );
    }

    let room = query::active_room(&world);
    let dirty = room.background().dirty();
    for (column, row) in [(3, 4), (7, 2), (20, 15)] {
        assert!(dirty.contains(&room.tile(column, row).bounds()));
    }
    assert!(room.should_render());

    world::draw(&mut world, &assets, &mut sink);
    assert!(!query::active_room(&world).should_render());
    assert_eq!(sink.composites, 2);
}

#[test]
fn draw_issues_one_sprite_per_object() {
    let (mut world, assets) = build(RoomPlan::Open);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnPlayer {
            player: PlayerNumber::Two,
            position: Vec2::new(100.0, 100.0),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: Vec2::new(200.0, 100.0),
        },
        &mut events,
    );

    let mut sink = CountingSink::default();
    world::draw(&mut world, &assets, &mut sink);

    assert_eq!(sink.composites, 1);
    assert_eq!(sink.sprites.len(), 2);
    assert_eq!(sink.sprites[0].position, Vec2::new(112.0, 112.0));
}

#[test]
fn layouts_survive_a_csv_round_trip_through_a_room() {
    let (mut world, _) = build(RoomPlan::Walled {
        seed: 0x5eed,
        pillars: 10,
    });
    let saved = query::layout(&world);
    assert!(saved.iter().any(|(_, _, tile)| tile.is_wall()));
    let csv = saved.to_csv();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLayout {
            layout: TileLayout::filled(saved.columns(), saved.rows(), TileType::Ground),
        },
        &mut events,
    );
    assert_ne!(query::layout(&world), saved);

    let loaded = TileLayout::from_csv(&csv).expect("saved layout parses");
    world::apply(&mut world, Command::LoadLayout { layout: loaded }, &mut events);

    assert_eq!(query::layout(&world), saved);
    assert_eq!(
        events.last(),
        Some(&Event::LayoutLoaded {
            room: query::active_coord(&world)
        })
    );
}

#[test]
fn walls_stop_players_walking_into_them() {
    let (mut world, _) = build(RoomPlan::Open);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PaintTile {
            column: 5,
            row: 3,
            tile: TileType::Wall,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnPlayer {
            player: PlayerNumber::One,
            position: Vec2::new(130.0, 100.0),
        },
        &mut events,
    );

    let mut input = InputState::new();
    for _ in 0..20 {
        input.advance(InputFrame::new().with_key(Key::Right));
        let _ = tick(&mut world, &input);
    }

    let player = &query::active_room(&world).objects()[0];
    assert_eq!(player.bounds().right(), 160);
}
