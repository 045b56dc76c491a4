//! # Dungeon Generation
//!
//! Room-and-corridor floor synthesis.
//!
//! The generator makes a fixed number of placement attempts. Each attempt
//! samples a room size and position; candidates overlapping an accepted room
//! are thrown away without retrying. Accepted rooms are carved and chained to
//! the previous room's center with an L-shaped pair of tunnels, so every room
//! is reachable from the first one.

use crate::{
    DungeonFloor, EncounterGenerator, Entity, GenerationConfig, Generator, GidError, GidResult,
    Position, Rect, TileGrid, STAIRS_DOWN_NAME, STAIRS_UP_NAME,
};
use ::pathfinding::prelude::bfs_reach;
use log::{debug, info};
use rand::{rngs::StdRng, Rng};
use std::collections::HashSet;

/// Primary floor generator.
#[derive(Debug, Clone, Copy)]
pub struct RoomCorridorGenerator {
    /// Whether accepted rooms get monsters and items
    pub populate: bool,
    encounters: EncounterGenerator,
}

impl RoomCorridorGenerator {
    /// Creates a generator that populates every room.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::generation::utils::create_rng;
    /// use gid::{GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let config = GenerationConfig::new(1234);
    /// let mut rng = create_rng(&config);
    /// let floor = RoomCorridorGenerator::new().generate(&config, 1, &mut rng).unwrap();
    /// assert!(!floor.rooms.is_empty());
    /// assert!(floor.stairs_down().is_some());
    /// ```
    pub fn new() -> Self {
        Self {
            populate: true,
            encounters: EncounterGenerator::new(),
        }
    }

    /// Creates a generator that only lays out rooms, tunnels and stairs.
    pub fn without_population() -> Self {
        Self {
            populate: false,
            ..Self::new()
        }
    }

    /// Samples a candidate room fully inside the map.
    fn room_candidate(&self, config: &GenerationConfig, rng: &mut StdRng) -> Rect {
        let w = rng.gen_range(config.min_room_size..=config.max_room_size) as i32;
        let h = rng.gen_range(config.min_room_size..=config.max_room_size) as i32;
        let x = rng.gen_range(0..=(config.width as i32 - w - 1));
        let y = rng.gen_range(0..=(config.height as i32 - h - 1));
        Rect::new(x, y, w, h)
    }

    /// Opens the interior of a room, leaving its outer edge as wall.
    pub fn carve_room(&self, tiles: &mut TileGrid, room: &Rect) {
        for pos in room.interior_positions() {
            tiles.carve(pos);
        }
    }

    /// Opens a horizontal tunnel on row `y`, both ends included.
    pub fn h_tunnel(&self, tiles: &mut TileGrid, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            tiles.carve(Position::new(x, y));
        }
    }

    /// Opens a vertical tunnel on column `x`, both ends included.
    pub fn v_tunnel(&self, tiles: &mut TileGrid, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            tiles.carve(Position::new(x, y));
        }
    }

    /// Joins two room centers with a coin-flip choice of tunnel order.
    fn connect(&self, tiles: &mut TileGrid, from: Position, to: Position, rng: &mut StdRng) {
        if rng.gen_bool(0.5) {
            self.h_tunnel(tiles, from.x, to.x, from.y);
            self.v_tunnel(tiles, from.y, to.y, to.x);
        } else {
            self.v_tunnel(tiles, from.y, to.y, from.x);
            self.h_tunnel(tiles, from.x, to.x, to.y);
        }
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<DungeonFloor> for RoomCorridorGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        dungeon_level: u32,
        rng: &mut StdRng,
    ) -> GidResult<DungeonFloor> {
        config.validate()?;

        let mut tiles = TileGrid::new(config.width, config.height);
        let mut rooms: Vec<Rect> = Vec::new();
        let mut entities: Vec<Entity> = Vec::new();
        let mut skipped = 0;

        for attempt in 0..config.max_rooms {
            let room = self.room_candidate(config, rng);
            if rooms.iter().any(|other| room.intersects(other)) {
                debug!("Attempt {}: room {:?} overlaps, skipped", attempt, room);
                continue;
            }

            self.carve_room(&mut tiles, &room);
            match rooms.last() {
                None => {
                    entities.push(Entity::stairs(room.center(), '<', STAIRS_UP_NAME));
                }
                Some(previous) => {
                    self.connect(&mut tiles, previous.center(), room.center(), rng);
                }
            }
            if self.populate {
                let report = self
                    .encounters
                    .populate(&room, dungeon_level, &tiles, &mut entities, rng);
                skipped += report.skipped;
                debug!(
                    "Attempt {}: accepted room {:?} with {} monsters, {} items",
                    attempt, room, report.monsters, report.items
                );
            } else {
                debug!("Attempt {}: accepted room {:?}", attempt, room);
            }
            rooms.push(room);
        }

        let last = rooms.last().ok_or_else(|| {
            GidError::GenerationFailed(format!(
                "No room accepted after {} attempts",
                config.max_rooms
            ))
        })?;
        entities.push(Entity::stairs(last.center(), '>', STAIRS_DOWN_NAME));

        info!(
            "Generated dungeon level {}: {} rooms, {} entities ({} placements skipped), {} open tiles",
            dungeon_level,
            rooms.len(),
            entities.len(),
            skipped,
            tiles.open_tile_count()
        );

        let floor = DungeonFloor::new(tiles, rooms, entities, dungeon_level)?;
        self.validate(&floor, config)?;
        Ok(floor)
    }

    /// Checks that every room center is open and reachable from the spawn room.
    fn validate(&self, floor: &DungeonFloor, _config: &GenerationConfig) -> GidResult<()> {
        let Some(spawn) = floor.rooms.first().map(|room| room.center()) else {
            return Err(GidError::GenerationFailed("Floor has no rooms".to_string()));
        };
        let reachable = reachable_from(&floor.tiles, spawn);
        for room in &floor.rooms {
            if !reachable.contains(&room.center()) {
                return Err(GidError::GenerationFailed(format!(
                    "Room centered at {:?} is unreachable",
                    room.center()
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

/// Flood fill over unblocked tiles with 8-way movement.
pub fn reachable_from(tiles: &TileGrid, start: Position) -> HashSet<Position> {
    if tiles.is_blocked(start) {
        return HashSet::new();
    }
    bfs_reach(start, |pos| {
        pos.adjacent_positions()
            .into_iter()
            .filter(move |next| !tiles.is_blocked(*next))
    })
    .collect()
}
