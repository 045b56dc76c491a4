//! # Autoexplore Module
//!
//! A stair-seeking autopilot for headless runs and debugging.
//!
//! Each call looks at the session and produces the next [`PlayerIntent`]:
//! fight whatever is adjacent, drink when badly hurt, pick up loot underfoot,
//! take the stairs down when standing on them, and otherwise walk the
//! shortest path toward them.

use crate::{
    find_path, Direction, GameSession, ItemEffect, PlayerIntent, Position, RunState,
    VisibilityOracle,
};
use log::trace;

/// Autoexplore state and functionality for debug mode.
#[derive(Debug, Clone)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Remaining steps toward `target`, excluding the current position
    pub current_path: Vec<Position>,
    /// Where the current path leads
    pub target: Option<Position>,
}

impl AutoexploreState {
    /// Creates a new, disabled autopilot.
    pub fn new() -> Self {
        Self {
            enabled: false,
            current_path: Vec::new(),
            target: None,
        }
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.current_path.clear();
            self.target = None;
        }
        self.enabled
    }

    /// Picks the next intent for the player, or `None` when disabled or dead.
    pub fn next_intent<V: VisibilityOracle>(
        &mut self,
        session: &GameSession<V>,
    ) -> Option<PlayerIntent> {
        if !self.enabled || session.state() == RunState::Dead {
            return None;
        }
        let floor = session.floor();
        let player = session.player()?;
        let here = player.position;

        for direction in Direction::all() {
            let pos = here + direction.to_delta();
            let hostile = floor
                .get_stuff(pos)
                .iter()
                .any(|entity| entity.ai.is_some() && entity.fighter.is_some());
            if hostile && session.is_visible(pos) {
                self.current_path.clear();
                return Some(PlayerIntent::Attack(direction));
            }
        }

        if player.hp() * 2 <= player.max_hp() {
            let draught = player.inventory.iter().position(|carried| {
                matches!(
                    carried.item.as_ref().and_then(|item| item.effect),
                    Some(ItemEffect::Heal { .. })
                )
            });
            if let Some(index) = draught {
                return Some(PlayerIntent::Use(index));
            }
        }

        let loot_underfoot = floor
            .get_stuff(here)
            .iter()
            .any(|entity| entity.item.is_some());
        if loot_underfoot && player.inventory.len() < session.config.inventory_capacity {
            return Some(PlayerIntent::PickUp);
        }

        let stairs = floor.stairs_down()?.position;
        if here == stairs {
            self.current_path.clear();
            self.target = None;
            return Some(PlayerIntent::Descend);
        }

        if self.target != Some(stairs) {
            self.current_path.clear();
        }
        if let Some(direction) = self.follow_path(session, here) {
            return Some(PlayerIntent::Move(direction));
        }

        match find_path(floor, session.player_id(), stairs, None) {
            Some(path) => {
                self.current_path = path.into_iter().skip(1).collect();
                self.target = Some(stairs);
                self.follow_path(session, here)
                    .map(PlayerIntent::Move)
                    .or(Some(PlayerIntent::Wait))
            }
            None => {
                trace!("No path from {:?} to the stairs at {:?}", here, stairs);
                Some(PlayerIntent::Wait)
            }
        }
    }

    /// Takes the next step of the current path if it is still walkable.
    fn follow_path<V: VisibilityOracle>(
        &mut self,
        session: &GameSession<V>,
        here: Position,
    ) -> Option<Direction> {
        let next = *self.current_path.first()?;
        match Direction::from_delta(next - here) {
            Some(direction) if !session.floor().is_blocked(next) => {
                self.current_path.remove(0);
                Some(direction)
            }
            _ => {
                self.current_path.clear();
                None
            }
        }
    }
}

impl Default for AutoexploreState {
    fn default() -> Self {
        Self::new()
    }
}
