//! # Generation Module
//!
//! Procedural content generation: floor layouts, monster placement and items.
//!
//! Floors are built by carving rectangular rooms out of solid rock and
//! chaining them with L-shaped tunnels. Every accepted room is populated
//! with a level-scaled random number of monsters and items.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::config;
use crate::game::Position;
use crate::{GidError, GidResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for floor generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible runs
    pub seed: u64,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Number of room placement attempts
    pub max_rooms: u32,
    /// Smallest room edge, walls included
    pub min_room_size: u32,
    /// Largest room edge, walls included
    pub max_room_size: u32,
}

impl GenerationConfig {
    /// Creates the standard 80×43 configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.max_rooms, 30);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            max_rooms: config::DEFAULT_MAX_ROOMS,
            min_room_size: config::DEFAULT_MIN_ROOM_SIZE,
            max_room_size: config::DEFAULT_MAX_ROOM_SIZE,
        }
    }

    /// Creates a configuration for testing with small, sparse floors.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 30,
            max_rooms: 8,
            min_room_size: 4,
            max_room_size: 8,
        }
    }

    /// Rejects parameters that could produce a floor without rooms.
    pub fn validate(&self) -> GidResult<()> {
        if self.max_rooms == 0 {
            return Err(GidError::GenerationFailed(
                "max_rooms must be at least 1".to_string(),
            ));
        }
        if self.min_room_size < 3 {
            return Err(GidError::GenerationFailed(format!(
                "min_room_size {} leaves no room interior",
                self.min_room_size
            )));
        }
        if self.min_room_size > self.max_room_size {
            return Err(GidError::GenerationFailed(format!(
                "min_room_size {} exceeds max_room_size {}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.max_room_size >= self.width || self.max_room_size >= self.height {
            return Err(GidError::GenerationFailed(format!(
                "a {}-tile room does not fit a {}x{} map",
                self.max_room_size, self.width, self.height
            )));
        }
        if u64::from(self.width) * u64::from(self.height) > config::MAX_MAP_TILES {
            return Err(GidError::GenerationFailed(format!(
                "a {}x{} map exceeds {} tiles",
                self.width,
                self.height,
                config::MAX_MAP_TILES
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Axis-aligned room bounds.
///
/// The outer edge is wall; only tiles strictly inside are carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Creates a rect from its top-left corner and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::{Position, Rect};
    ///
    /// let room = Rect::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert_eq!(room.interior_positions().len(), 9 * 7);
    /// ```
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Half-open overlap test: rects that only share an edge line do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 < other.x2 && self.x2 > other.x1 && self.y1 < other.y2 && self.y2 > other.y1
    }

    /// Whether a position lies strictly inside the walls.
    pub fn contains_interior(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Every carved position of the room.
    pub fn interior_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for x in (self.x1 + 1)..self.x2 {
            for y in (self.y1 + 1)..self.y2 {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// A uniformly random carved position.
    pub fn random_interior_position(&self, rng: &mut StdRng) -> Position {
        Position::new(
            rng.gen_range((self.x1 + 1)..self.x2),
            rng.gen_range((self.y1 + 1)..self.y2),
        )
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the given dungeon level.
    fn generate(&self, config: &GenerationConfig, dungeon_level: u32, rng: &mut StdRng) -> GidResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> GidResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.width, 80);
        assert_eq!(config.height, 43);
        assert_eq!(config.min_room_size, 6);
        assert_eq!(config.max_room_size, 10);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());
    }

    #[test]
    fn test_degenerate_configs_are_rejected() {
        let base = GenerationConfig::new(1);
        let cases = [
            GenerationConfig { max_rooms: 0, ..base.clone() },
            GenerationConfig { min_room_size: 2, ..base.clone() },
            GenerationConfig { min_room_size: 9, max_room_size: 8, ..base.clone() },
            GenerationConfig { width: 10, ..base.clone() },
            GenerationConfig { height: 7, ..base.clone() },
            GenerationConfig { width: 70_000, height: 70_000, ..base.clone() },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_rect_geometry() {
        let room = Rect::new(5, 5, 10, 8);
        assert_eq!((room.x2, room.y2), (15, 13));
        assert_eq!(room.center(), Position::new(10, 9));
        assert!(room.contains_interior(Position::new(6, 6)));
        assert!(!room.contains_interior(Position::new(5, 6)));
        assert!(!room.contains_interior(Position::new(15, 6)));
    }

    #[test]
    fn test_rect_intersection_is_half_open() {
        let room = Rect::new(5, 5, 10, 8);
        assert!(room.intersects(&Rect::new(10, 8, 6, 6)));
        assert!(room.intersects(&room));
        // sharing the x = 15 edge line only
        assert!(!room.intersects(&Rect::new(15, 5, 4, 4)));
        assert!(!room.intersects(&Rect::new(30, 30, 5, 5)));
    }

    #[test]
    fn test_random_interior_position_stays_inside() {
        let mut rng = StdRng::seed_from_u64(11);
        let room = Rect::new(3, 4, 6, 5);
        for _ in 0..500 {
            assert!(room.contains_interior(room.random_interior_position(&mut rng)));
        }
    }
}
