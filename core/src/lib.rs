#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the CrashNet room simulation.
//!
//! This crate defines the geometry primitives, the message surface and the
//! collaborator interfaces that connect adapters, the authoritative world and
//! pure systems. Adapters and systems submit [`Command`] values describing
//! desired mutations, the world executes them through its `apply` entry point
//! and reports what happened as [`Event`] values. Everything the simulation
//! needs from the outside (textures, input, draw surfaces and cosmetic
//! effects) is reached through the traits re-exported here.

mod assets;
mod direction;
mod effects;
mod geometry;
mod input;
mod render;
mod tile;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use assets::{AssetId, AssetLookup, AssetRegistry, Color, ColorGrid, ImageHandle};
pub use direction::Direction;
pub use effects::{EffectEmitter, EffectFactory, EffectKind, TimedEffects, TimedEmitter};
pub use geometry::{intersection_depth, Axis, BoundingBox};
pub use glam::Vec2;
pub use input::{InputFrame, InputSnapshot, InputState, Key, PointerButton};
pub use render::{DrawCall, RenderSink};
pub use tile::{LayoutError, TileLayout, TileType};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Places a player character in the active room.
    SpawnPlayer {
        /// Seat controlling the new character.
        player: PlayerNumber,
        /// Top-left corner of the character in room pixels.
        position: Vec2,
    },
    /// Places an enemy in the active room.
    SpawnEnemy {
        /// Top-left corner of the enemy in room pixels.
        position: Vec2,
    },
    /// Removes an object from the active room.
    RemoveObject {
        /// Identifier of the object to remove.
        object: ObjectId,
    },
    /// Replaces a single tile of the active room.
    PaintTile {
        /// Zero-based column of the tile.
        column: u32,
        /// Zero-based row of the tile.
        row: u32,
        /// Type of the replacement tile.
        tile: TileType,
    },
    /// Replaces every tile of the active room with the provided layout.
    LoadLayout {
        /// Layout whose dimensions must match the room grid.
        layout: TileLayout,
    },
}

/// Events broadcast by the world after processing commands or ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Reports that simulation time advanced by the provided delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed during the tick.
        dt: Duration,
    },
    /// Announces that an object joined a room.
    ObjectSpawned {
        /// Identifier allocated to the object.
        object: ObjectId,
        /// Behaviour tag of the object.
        kind: ObjectKind,
        /// Room that received the object.
        room: RoomCoord,
    },
    /// Announces that an object left the simulation.
    ObjectRemoved {
        /// Identifier of the removed object.
        object: ObjectId,
        /// Room the object was removed from.
        room: RoomCoord,
    },
    /// Confirms that a tile was replaced.
    TilePainted {
        /// Room owning the tile.
        room: RoomCoord,
        /// Zero-based column of the tile.
        column: u32,
        /// Zero-based row of the tile.
        row: u32,
        /// Type of the replacement tile.
        tile: TileType,
    },
    /// Reports that a tile edit targeted a cell outside the room grid.
    TileRejected {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
    },
    /// Confirms that a persisted layout replaced a room's tiles.
    LayoutLoaded {
        /// Room whose tiles were replaced.
        room: RoomCoord,
    },
    /// Reports that a layout could not be applied to the active room.
    LayoutRejected {
        /// Reason the layout was refused.
        error: LayoutError,
    },
    /// Reports that the players moved to a neighbouring room.
    RoomChanged {
        /// Room the players left.
        from: RoomCoord,
        /// Room that is now active.
        to: RoomCoord,
        /// Edge the players left through.
        direction: Direction,
    },
}

/// Unique identifier assigned to a game object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a room inside the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCoord {
    column: u32,
    row: u32,
}

impl RoomCoord {
    /// Creates a new room coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column of the room.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row of the room.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Seat controlling a player character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerNumber {
    /// First seat, bound to the arrow keys and space.
    One,
    /// Second seat, bound to W/A/S/D and F.
    Two,
}

impl PlayerNumber {
    /// Sprite used to draw the player.
    #[must_use]
    pub const fn asset(self) -> AssetId {
        match self {
            Self::One => AssetId::PlayerOne,
            Self::Two => AssetId::PlayerTwo,
        }
    }
}

/// Behaviour tag carried by every game object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Player-controlled character.
    Player(PlayerNumber),
    /// Hostile character that can be shot.
    Enemy,
    /// Shot fired by a player.
    Projectile,
}

impl ObjectKind {
    /// Reports whether the kind is a player character.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player(_))
    }

    /// Sprite used to draw objects of this kind.
    #[must_use]
    pub const fn asset(self) -> AssetId {
        match self {
            Self::Player(player) => player.asset(),
            Self::Enemy => AssetId::Enemy,
            Self::Projectile => AssetId::Projectile,
        }
    }
}
