use crashnet_core::{
    AssetRegistry, Command, Direction, Event, InputFrame, InputState, PointerButton, RoomCoord,
    TileType, Vec2,
};
use crashnet_system_editor::{Editor, GridShape};
use crashnet_world::{self as world, query, World, WorldRecipe};

const SHAPE: GridShape = GridShape::new(25, 19, 32);

fn frame(button: Option<PointerButton>, pointer: Vec2) -> InputFrame {
    let frame = InputFrame::new().with_pointer(pointer);
    match button {
        Some(button) => frame.with_button(button),
        None => frame,
    }
}

#[test]
fn held_left_button_paints_walls_once_per_cell() {
    let mut editor = Editor::new();
    let mut input = InputState::new();
    let mut commands = Vec::new();

    for pointer in [
        Vec2::new(40.0, 40.0),
        Vec2::new(50.0, 45.0),
        Vec2::new(70.0, 45.0),
    ] {
        input.advance(frame(Some(PointerButton::Left), pointer));
        editor.handle(&[], &input, SHAPE, &mut commands);
    }

    assert_eq!(
        commands,
        vec![
            Command::PaintTile {
                column: 1,
                row: 1,
                tile: TileType::Wall,
            },
            Command::PaintTile {
                column: 2,
                row: 1,
                tile: TileType::Wall,
            },
        ],
    );
}

#[test]
fn right_button_paints_ground_and_release_allows_repainting() {
    let mut editor = Editor::default();
    let mut input = InputState::new();
    let mut commands = Vec::new();
    let pointer = Vec2::new(100.0, 100.0);

    input.advance(frame(Some(PointerButton::Right), pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);
    input.advance(frame(None, pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);
    input.advance(frame(Some(PointerButton::Right), pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);

    let ground = Command::PaintTile {
        column: 3,
        row: 3,
        tile: TileType::Ground,
    };
    assert_eq!(commands, vec![ground.clone(), ground]);
}

#[test]
fn pointer_outside_the_room_emits_nothing() {
    let mut editor = Editor::new();
    let mut input = InputState::new();
    let mut commands = Vec::new();

    input.advance(
        frame(Some(PointerButton::Left), Vec2::new(900.0, 10.0)).with_button(PointerButton::Middle),
    );
    editor.handle(&[], &input, SHAPE, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn middle_click_spawns_a_single_enemy() {
    let mut editor = Editor::new();
    let mut input = InputState::new();
    let mut commands = Vec::new();
    let pointer = Vec2::new(300.0, 200.0);

    input.advance(frame(Some(PointerButton::Middle), pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);
    input.advance(frame(Some(PointerButton::Middle), pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);

    assert_eq!(commands, vec![Command::SpawnEnemy { position: pointer }]);
}

#[test]
fn room_change_forgets_the_last_painted_cell() {
    let mut editor = Editor::new();
    let mut input = InputState::new();
    let mut commands = Vec::new();
    let pointer = Vec2::new(10.0, 10.0);

    input.advance(frame(Some(PointerButton::Left), pointer));
    editor.handle(&[], &input, SHAPE, &mut commands);
    input.advance(frame(Some(PointerButton::Left), pointer));
    editor.handle(
        &[Event::RoomChanged {
            from: RoomCoord::new(2, 2),
            to: RoomCoord::new(3, 2),
            direction: Direction::East,
        }],
        &input,
        SHAPE,
        &mut commands,
    );

    assert_eq!(commands.len(), 2);
}

#[test]
fn editor_commands_edit_the_active_room() {
    let recipe = WorldRecipe::default();
    let mut world = World::new(&recipe, &AssetRegistry::placeholder(recipe.tile_size));
    let shape = GridShape::new(recipe.room_columns, recipe.room_rows, recipe.tile_size);
    let mut editor = Editor::new();
    let mut input = InputState::new();
    let mut commands = Vec::new();

    input.advance(frame(Some(PointerButton::Left), Vec2::new(200.0, 130.0)));
    editor.handle(&[], &input, shape, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::layout(&world).get(6, 4), TileType::Wall);
    assert!(matches!(
        events.as_slice(),
        [Event::TilePainted {
            column: 6,
            row: 4,
            tile: TileType::Wall,
            ..
        }]
    ));
}
