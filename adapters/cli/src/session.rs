//! Scripted headless sessions.

use std::time::Duration;

use anyhow::Result;
use crashnet_core::{
    AssetRegistry, Command, Event, InputState, LayoutError, RoomCoord, TileLayout, TimedEffects,
    Vec2,
};
use crashnet_rendering::TextFrame;
use crashnet_system_editor::{Editor, GridShape};
use crashnet_world::{self as world, query, TickContext, World, WorldRecipe};
use log::{debug, info, trace};

use crate::config::SessionConfig;

/// Outcome of a finished session.
#[derive(Debug)]
pub(crate) struct SessionReport {
    pub(crate) ticks: u32,
    pub(crate) room_changes: Vec<(RoomCoord, RoomCoord)>,
    pub(crate) final_room: RoomCoord,
    pub(crate) objects: usize,
    pub(crate) frame: TextFrame,
    pub(crate) layout: TileLayout,
}

/// World plus the collaborators a headless run drives it with.
pub(crate) struct Session {
    config: SessionConfig,
    recipe: WorldRecipe,
    world: World,
    assets: AssetRegistry,
    effects: TimedEffects,
    input: InputState,
    editor: Editor,
    pending: Vec<Event>,
}

impl Session {
    /// Builds the world and places the configured players and enemies.
    pub(crate) fn new(config: SessionConfig) -> Self {
        let recipe = config.recipe();
        let assets = AssetRegistry::placeholder(recipe.tile_size);
        let mut world = World::new(&recipe, &assets);

        let mut pending = Vec::new();
        for spawn in &config.players {
            let [x, y] = spawn.position;
            world::apply(
                &mut world,
                Command::SpawnPlayer {
                    player: spawn.player,
                    position: Vec2::new(x, y),
                },
                &mut pending,
            );
        }
        for [x, y] in config.enemies.iter().copied() {
            world::apply(
                &mut world,
                Command::SpawnEnemy {
                    position: Vec2::new(x, y),
                },
                &mut pending,
            );
        }
        debug!("session prepared with {} spawn events", pending.len());

        Self {
            config,
            recipe,
            world,
            assets,
            effects: TimedEffects::default(),
            input: InputState::new(),
            editor: Editor::new(),
            pending,
        }
    }

    /// Replaces the start room's tiles.
    pub(crate) fn load_layout(&mut self, layout: TileLayout) -> Result<(), LayoutError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::LoadLayout { layout }, &mut events);
        match events.pop() {
            Some(Event::LayoutRejected { error }) => Err(error),
            _ => Ok(()),
        }
    }

    /// Runs every configured tick and summarises the result.
    pub(crate) fn run(mut self, ticks: u32) -> Result<SessionReport> {
        let dt = Duration::from_millis(self.config.session.tick_millis);
        let shape = GridShape::new(
            self.recipe.room_columns,
            self.recipe.room_rows,
            self.recipe.tile_size,
        );
        let mut room_changes = Vec::new();

        for tick in 0..ticks {
            self.input.advance(self.config.frame_at(tick));

            let mut commands = Vec::new();
            self.editor
                .handle(&self.pending, &self.input, shape, &mut commands);
            let mut events = Vec::new();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }

            let context = TickContext {
                elapsed: dt,
                input: &self.input,
                effects: &self.effects,
            };
            world::update(&mut self.world, &context, &mut events);

            for event in &events {
                match event {
                    Event::RoomChanged { from, to, .. } => room_changes.push((*from, *to)),
                    Event::TimeAdvanced { .. } => {}
                    other => trace!("tick {tick}: {other:?}"),
                }
            }
            self.pending = events;
        }

        let mut frame = TextFrame::new(
            self.recipe.room_columns,
            self.recipe.room_rows,
            self.recipe.tile_size,
        )?;
        world::draw(&mut self.world, &self.assets, &mut frame);

        let final_room = query::active_coord(&self.world);
        info!(
            "session finished after {ticks} ticks in room ({}, {})",
            final_room.column(),
            final_room.row()
        );
        Ok(SessionReport {
            ticks,
            room_changes,
            final_room,
            objects: query::active_room(&self.world).objects().len(),
            frame,
            layout: query::layout(&self.world),
        })
    }
}
