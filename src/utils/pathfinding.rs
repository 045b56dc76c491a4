//! # Pathfinding Algorithms
//!
//! Single-step movement toward a target for AI and the autopilot.
//!
//! Paths are searched with A* over a passability snapshot of the floor taken
//! at call time, so the current entity layout is always respected. When no
//! short path exists the mover falls back to stepping straight at the target.

use crate::config::MAX_PATH_STEPS;
use crate::{unit_step, Direction, DungeonFloor, EntityId, Message, Position};
use ::pathfinding::prelude::astar;
use log::trace;
use rand::rngs::StdRng;

/// Cost of an orthogonal step.
const STRAIGHT_COST: u32 = 100;
/// Cost of a diagonal step, 1.41 times an orthogonal one.
const DIAGONAL_COST: u32 = 141;

/// Walkability of every tile at one instant.
///
/// Blocking entities count as walls, except the mover and the target so
/// that both ends of a path stay open.
#[derive(Debug, Clone)]
pub struct PassabilityMap {
    width: i32,
    height: i32,
    open: Vec<bool>,
}

impl PassabilityMap {
    /// Takes a fresh snapshot of `floor`.
    pub fn snapshot(floor: &DungeonFloor, mover: EntityId, target: Option<EntityId>) -> Self {
        let width = floor.tiles.width() as i32;
        let height = floor.tiles.height() as i32;
        let mut open = vec![false; (width * height) as usize];

        for pos in floor.tiles.positions() {
            open[(pos.x * height + pos.y) as usize] = !floor.tiles.is_blocked(pos);
        }
        for entity in floor.entities() {
            if !entity.blocks || entity.id == mover || Some(entity.id) == target {
                continue;
            }
            if floor.tiles.in_bounds(entity.position) {
                open[(entity.position.x * height + entity.position.y) as usize] = false;
            }
        }

        Self { width, height, open }
    }

    pub fn is_open(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && self.open[(pos.x * self.height + pos.y) as usize]
    }

    /// Open neighbours of `pos` with their step costs.
    fn successors(&self, pos: Position) -> Vec<(Position, u32)> {
        Direction::all()
            .into_iter()
            .map(|direction| direction.to_delta())
            .filter(|delta| self.is_open(pos + *delta))
            .map(|delta| {
                let cost = if delta.x != 0 && delta.y != 0 {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                (pos + delta, cost)
            })
            .collect()
    }

    /// Shortest path from `start` to `goal`, both included.
    pub fn shortest_path(&self, start: Position, goal: Position) -> Option<Vec<Position>> {
        if !self.is_open(goal) {
            return None;
        }
        astar(
            &start,
            |pos| self.successors(*pos),
            |pos| octile_distance(*pos, goal),
            |pos| *pos == goal,
        )
        .map(|(path, _cost)| path)
    }
}

/// Admissible A* heuristic for 8-way movement with the costs above.
fn octile_distance(from: Position, to: Position) -> u32 {
    let dx = (from.x - to.x).unsigned_abs();
    let dy = (from.y - to.y).unsigned_abs();
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}

/// Shortest path for `mover` to `goal` on the current floor.
///
/// `target` names an entity standing at the goal that should not block
/// the search.
pub fn find_path(
    floor: &DungeonFloor,
    mover: EntityId,
    goal: Position,
    target: Option<EntityId>,
) -> Option<Vec<Position>> {
    let start = floor.get(mover)?.position;
    PassabilityMap::snapshot(floor, mover, target).shortest_path(start, goal)
}

/// Moves `mover` one step toward `target`.
///
/// Follows the A* path when one exists and is shorter than
/// [`MAX_PATH_STEPS`]; otherwise steps straight at the target.
pub fn move_astar(
    floor: &mut DungeonFloor,
    mover: EntityId,
    target: EntityId,
    rng: &mut StdRng,
) -> Vec<Message> {
    let (Some(origin), Some(goal)) = (
        floor.get(mover).map(|entity| entity.position),
        floor.get(target).map(|entity| entity.position),
    ) else {
        return Vec::new();
    };

    match find_path(floor, mover, goal, Some(target)) {
        Some(path) if path.len() > 1 && path.len() - 1 < MAX_PATH_STEPS => {
            floor.move_by(mover, path[1] - origin, rng).messages
        }
        Some(path) => {
            trace!(
                "Path of {} steps from {:?} to {:?} too long, approaching directly",
                path.len().saturating_sub(1),
                origin,
                goal
            );
            move_towards(floor, mover, goal, rng)
        }
        None => {
            trace!("No path from {:?} to {:?}, approaching directly", origin, goal);
            move_towards(floor, mover, goal, rng)
        }
    }
}

/// Steps `mover` along the rounded unit vector toward `goal`.
///
/// The step goes through the normal blocked-movement check, so a player
/// walking into something solid still gets hurt.
pub fn move_towards(
    floor: &mut DungeonFloor,
    mover: EntityId,
    goal: Position,
    rng: &mut StdRng,
) -> Vec<Message> {
    let Some(origin) = floor.get(mover).map(|entity| entity.position) else {
        return Vec::new();
    };
    let step = unit_step(origin, goal);
    if step == Position::new(0, 0) {
        return Vec::new();
    }
    floor.move_by(mover, step, rng).messages
}
