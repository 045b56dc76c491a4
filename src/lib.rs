//! # GID Dungeon Crawler
//!
//! The engine of a turn-based dungeon crawler: procedural floor synthesis plus
//! the turn-resolution, combat and monster AI that drive play.
//!
//! ## Architecture Overview
//!
//! The crate is the part of the game that does real work. Rendering, input
//! decoding and score persistence live outside it and talk to it through a
//! narrow surface:
//!
//! - **Generation**: room-and-corridor layout synthesis and level-scaled
//!   entity placement ([`RoomCorridorGenerator`])
//! - **Dungeon Floor**: tile grid, entity list and stairs with occupancy
//!   queries ([`DungeonFloor`])
//! - **Combat**: dice-roll attacks, damage, single-fire death hooks, experience
//! - **AI & Pathfinding**: field-of-view gated monsters stepping along A* paths
//! - **Game Session**: the turn scheduler that resolves one [`PlayerIntent`]
//!   and then runs every AI ([`GameSession`])
//!
//! Everything random flows through a seeded [`rand::rngs::StdRng`], so a
//! session built from the same [`GameConfig`] replays identically.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

pub use generation::{
    EncounterGenerator, GenerationConfig, Generator, ItemGenerator, Rect, RoomCorridorGenerator,
};

/// Core error type for the GID engine.
#[derive(thiserror::Error, Debug)]
pub enum GidError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the GID codebase.
pub type GidResult<T> = Result<T, GidError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 43;

    /// Default number of room placement attempts per floor
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Default smallest room edge, walls included
    pub const DEFAULT_MIN_ROOM_SIZE: u32 = 6;

    /// Default largest room edge, walls included
    pub const DEFAULT_MAX_ROOM_SIZE: u32 = 10;

    /// Largest map area, in tiles, generation accepts
    pub const MAX_MAP_TILES: u64 = 1 << 20;

    /// Radius of the player's light
    pub const FOV_RADIUS: i32 = 10;

    /// Number of items the player can carry
    pub const INVENTORY_MAX: usize = 26;

    /// Number of messages kept in the visible backlog
    pub const MESSAGE_BACKLOG: usize = 5;

    /// Experience needed for the first level-up
    pub const LEVEL_UP_BASE: i32 = 200;

    /// Extra experience needed per character level
    pub const LEVEL_UP_FACTOR: i32 = 150;

    /// Experience granted per dungeon level when descending
    pub const DLEVEL_XP: i32 = 10;

    /// Score granted per dungeon level when descending
    pub const DLEVEL_SCORE: u64 = 100;

    /// Paths at least this long are abandoned for a direct approach
    pub const MAX_PATH_STEPS: usize = 25;

    /// Damage range for running into something solid
    pub const WALL_BUMP_DAMAGE: (i32, i32) = (1, 5);

    /// Chance of falling when taking the stairs down
    pub const STAIR_TUMBLE_CHANCE: f64 = 0.1;

    /// Damage range for falling down the stairs
    pub const STAIR_TUMBLE_DAMAGE: (i32, i32) = (1, 4);

    /// Damage dealt by trying to climb back up
    pub const ASCEND_DAMAGE: i32 = 100;

    /// Hit points restored by a healing draught
    pub const HEAL_AMOUNT: i32 = 10;
}
