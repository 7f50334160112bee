//! TOML session configuration.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use crashnet_core::{InputFrame, Key, PlayerNumber, PointerButton, Vec2};
use crashnet_world::{RoomPlan, WorldNumber, WorldRecipe};
use serde::Deserialize;

const DEFAULT_TICKS: u32 = 120;
const DEFAULT_TICK_MILLIS: u64 = 16;

/// Everything needed to run a scripted headless session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) world: WorldSection,
    pub(crate) session: TimingSection,
    pub(crate) players: Vec<PlayerSpawn>,
    pub(crate) enemies: Vec<[f32; 2]>,
    pub(crate) script: Vec<ScriptStep>,
}

/// World size and room generation settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) number: WorldChoice,
    pub(crate) room_columns: Option<u32>,
    pub(crate) room_rows: Option<u32>,
    pub(crate) tile_size: Option<u32>,
    pub(crate) entrance_padding: Option<f32>,
    pub(crate) walls: Option<WallSection>,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            number: WorldChoice::One,
            room_columns: None,
            room_rows: None,
            tile_size: None,
            entrance_padding: None,
            walls: None,
        }
    }
}

/// Predefined world sizes accepted in configuration and on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WorldChoice {
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

impl From<WorldChoice> for WorldNumber {
    fn from(choice: WorldChoice) -> Self {
        match choice {
            WorldChoice::One => Self::One,
            WorldChoice::Two => Self::Two,
            WorldChoice::Three => Self::Three,
            WorldChoice::Four => Self::Four,
        }
    }
}

/// Perimeter walls and seeded pillars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WallSection {
    pub(crate) seed: u64,
    #[serde(default)]
    pub(crate) pillars: u32,
}

/// Tick count and simulated tick length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TimingSection {
    pub(crate) ticks: u32,
    pub(crate) tick_millis: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            tick_millis: DEFAULT_TICK_MILLIS,
        }
    }
}

/// Player placed in the start room before the first tick.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlayerSpawn {
    pub(crate) player: PlayerNumber,
    pub(crate) position: [f32; 2],
}

/// Input held during a half-open range of ticks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    pub(crate) from: u32,
    pub(crate) until: u32,
    #[serde(default)]
    pub(crate) keys: Vec<Key>,
    #[serde(default)]
    pub(crate) buttons: Vec<PointerButton>,
    #[serde(default)]
    pub(crate) pointer: Option<[f32; 2]>,
}

impl SessionConfig {
    /// Reads and validates a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    /// World recipe described by the configuration.
    pub(crate) fn recipe(&self) -> WorldRecipe {
        let world = &self.world;
        let mut recipe = WorldRecipe::for_world(world.number.into());
        if let Some(columns) = world.room_columns {
            recipe.room_columns = columns;
        }
        if let Some(rows) = world.room_rows {
            recipe.room_rows = rows;
        }
        if let Some(tile_size) = world.tile_size {
            recipe.tile_size = tile_size;
            recipe.entrance_padding = tile_size as f32;
        }
        if let Some(padding) = world.entrance_padding {
            recipe.entrance_padding = padding;
        }
        if let Some(walls) = world.walls {
            recipe.plan = RoomPlan::Walled {
                seed: walls.seed,
                pillars: walls.pillars,
            };
        }
        recipe
    }

    /// Input frame the script holds during `tick`.
    pub(crate) fn frame_at(&self, tick: u32) -> InputFrame {
        let mut frame = InputFrame::new();
        for step in self
            .script
            .iter()
            .filter(|step| (step.from..step.until).contains(&tick))
        {
            for key in &step.keys {
                frame = frame.with_key(*key);
            }
            for button in &step.buttons {
                frame = frame.with_button(*button);
            }
            if let Some([x, y]) = step.pointer {
                frame = frame.with_pointer(Vec2::new(x, y));
            }
        }
        frame
    }

    fn validate(&self) -> Result<()> {
        let recipe = self.recipe();
        if recipe.room_columns == 0 || recipe.room_rows == 0 {
            bail!(
                "rooms must contain at least one tile (got {}x{})",
                recipe.room_columns,
                recipe.room_rows
            );
        }
        if recipe.tile_size == 0 {
            bail!("tile_size must be positive");
        }
        if recipe.entrance_padding < recipe.tile_size as f32 {
            bail!(
                "entrance_padding {} is smaller than a tile ({})",
                recipe.entrance_padding,
                recipe.tile_size
            );
        }
        if self.session.tick_millis == 0 {
            bail!("tick_millis must be positive");
        }
        for step in &self.script {
            if step.from >= step.until {
                bail!(
                    "script step covers no ticks: from {} until {}",
                    step.from,
                    step.until
                );
            }
        }
        Ok(())
    }
}
