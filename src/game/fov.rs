//! # Field of View
//!
//! The visibility oracle consulted by monster AI and by the explored-tile
//! bookkeeping. The engine only decides *when* to recompute and what to do
//! with the answer; how visibility is computed sits behind a trait so the
//! rendering side can supply its own.

use crate::{Position, TileGrid};
use std::collections::HashSet;

/// Computes and answers visibility from a single origin.
pub trait VisibilityOracle {
    /// Recomputes the visible set from `origin` within `radius` tiles.
    fn compute(&mut self, tiles: &TileGrid, origin: Position, radius: i32);

    /// Whether the tile was visible at the last computation.
    fn is_visible(&self, pos: Position) -> bool;
}

/// Ray-casting field of view.
///
/// Casts a Bresenham line from the origin to every tile on the perimeter of
/// the surrounding square. A ray stops at the first sight-blocking tile,
/// which is itself lit so walls bordering a room are seen.
#[derive(Debug, Clone, Default)]
pub struct RaycastFov {
    visible: HashSet<Position>,
}

impl RaycastFov {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles currently visible.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Currently visible positions, in no particular order.
    pub fn visible_positions(&self) -> impl Iterator<Item = &Position> {
        self.visible.iter()
    }

    fn cast_ray(&mut self, tiles: &TileGrid, origin: Position, target: Position, radius: i32) {
        for pos in bresenham_line(origin, target).into_iter().skip(1) {
            if !tiles.in_bounds(pos) {
                break;
            }
            let dx = pos.x - origin.x;
            let dy = pos.y - origin.y;
            if dx * dx + dy * dy > radius * radius {
                break;
            }
            self.visible.insert(pos);
            if tiles.blocks_sight(pos) {
                break;
            }
        }
    }
}

impl VisibilityOracle for RaycastFov {
    fn compute(&mut self, tiles: &TileGrid, origin: Position, radius: i32) {
        self.visible.clear();
        if !tiles.in_bounds(origin) {
            return;
        }
        self.visible.insert(origin);
        if radius <= 0 {
            return;
        }

        for offset in -radius..=radius {
            self.cast_ray(tiles, origin, origin + Position::new(offset, -radius), radius);
            self.cast_ray(tiles, origin, origin + Position::new(offset, radius), radius);
            self.cast_ray(tiles, origin, origin + Position::new(-radius, offset), radius);
            self.cast_ray(tiles, origin, origin + Position::new(radius, offset), radius);
        }
    }

    fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }
}

/// Tiles on the line from `from` to `to`, both ends included.
fn bresenham_line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };
    let mut error = dx + dy;
    let mut current = from;
    let mut line = vec![current];

    while current != to {
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            current.x += step_x;
        }
        if doubled <= dx {
            error += dx;
            current.y += step_y;
        }
        line.push(current);
    }
    line
}
