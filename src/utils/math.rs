//! # Game Mathematics
//!
//! Level-scaling step functions and grid vector helpers.

use crate::Position;

/// A step function over dungeon levels as `(value, from_level)` pairs.
///
/// Entries must be sorted by ascending `from_level`.
pub type LevelTable = [(u32, u32)];

/// Looks up the value in effect at `dungeon_level`.
///
/// The table is scanned from its highest threshold downward and the first
/// entry whose level is at or below `dungeon_level` wins. Levels below every
/// threshold yield 0.
///
/// # Examples
///
/// ```
/// use gid::from_dungeon_level;
///
/// let table = [(2, 1), (3, 4), (5, 6)];
/// assert_eq!(from_dungeon_level(&table, 1), 2);
/// assert_eq!(from_dungeon_level(&table, 5), 3);
/// assert_eq!(from_dungeon_level(&table, 40), 5);
/// assert_eq!(from_dungeon_level(&table, 0), 0);
/// ```
pub fn from_dungeon_level(table: &LevelTable, dungeon_level: u32) -> u32 {
    table
        .iter()
        .rev()
        .find(|(_, level)| *level <= dungeon_level)
        .map(|(value, _)| *value)
        .unwrap_or(0)
}

/// Rounds the unit vector from `from` toward `to` onto a single king move.
///
/// Each axis of the normalised vector is rounded to the nearest of
/// `-1`, `0` or `1`. Identical positions yield a zero step.
pub fn unit_step(from: Position, to: Position) -> Position {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return Position::new(0, 0);
    }
    Position::new((dx / distance).round() as i32, (dy / distance).round() as i32)
}
