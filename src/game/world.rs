//! # Tile Grid
//!
//! The fixed-shape map of passability and sight flags underneath a floor.

use crate::{GidError, GidResult, Position};
use serde::{Deserialize, Serialize};

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Whether movement through this tile is impossible
    pub blocked: bool,
    /// Whether this tile stops line of sight
    pub block_sight: bool,
    /// Whether the player has ever seen this tile
    pub explored: bool,
}

impl Tile {
    /// Creates a tile whose sight blocking follows its movement blocking.
    pub fn new(blocked: bool) -> Self {
        Self::with_sight(blocked, blocked)
    }

    /// Creates a tile with independent movement and sight blocking.
    pub fn with_sight(blocked: bool, block_sight: bool) -> Self {
        Self {
            blocked,
            block_sight,
            explored: false,
        }
    }

    /// Solid rock.
    pub fn wall() -> Self {
        Self::new(true)
    }

    /// Open floor.
    pub fn floor() -> Self {
        Self::new(false)
    }
}

/// Width × height grid of tiles, stored column-major by `x`.
///
/// The shape never changes after construction; only the flags of
/// individual tiles do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid filled entirely with walls.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::{Position, TileGrid};
    ///
    /// let grid = TileGrid::new(10, 5);
    /// assert!(grid.is_blocked(Position::new(3, 3)));
    /// assert!(grid.is_blocked(Position::new(30, 3))); // out of bounds
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.x as usize * self.height as usize + pos.y as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |idx| &mut self.tiles[idx])
    }

    /// Replaces a tile, failing for positions outside the grid.
    pub fn set(&mut self, pos: Position, tile: Tile) -> GidResult<()> {
        let tile_slot = self.get_mut(pos).ok_or_else(|| {
            GidError::InvalidState(format!("Position {:?} is outside the tile grid", pos))
        })?;
        *tile_slot = tile;
        Ok(())
    }

    /// Opens a tile for both movement and sight. Out-of-bounds positions are ignored.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.get_mut(pos) {
            tile.blocked = false;
            tile.block_sight = false;
        }
    }

    /// Tile-only blocking; anything outside the grid counts as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get(pos).map(|tile| tile.blocked).unwrap_or(true)
    }

    /// Tile-only sight blocking; anything outside the grid blocks sight.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.get(pos).map(|tile| tile.block_sight).unwrap_or(true)
    }

    /// Marks a tile as seen. Explored flags are never cleared.
    pub fn mark_explored(&mut self, pos: Position) {
        if let Some(tile) = self.get_mut(pos) {
            tile.explored = true;
        }
    }

    /// Iterates every position of the grid, column by column.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let height = self.height as i32;
        (0..self.width as i32).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    /// Number of tiles that can be walked on.
    pub fn open_tile_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.blocked).count()
    }
}

/// Stacking order for entities sharing a tile.
///
/// Higher layers are drawn on top and are the first candidates for
/// "what is here" questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Fixtures such as stairs
    Tile,
    Trash,
    Item,
    Character,
}
