//! # Monster AI
//!
//! The basic monster's behaviour, re-derived from scratch every turn.
//!
//! No state survives between turns apart from the monster's position: each
//! call looks at the visibility oracle and the distance to the target and
//! picks one of three modes.

use crate::{attack, move_astar, DungeonFloor, EntityId, Message, VisibilityOracle};
use log::debug;
use rand::rngs::StdRng;

/// What a basic monster does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    /// Not in view; does nothing
    Idle,
    /// In view but two or more tiles away; closes in
    Approach,
    /// In view and adjacent; fights
    Engage,
}

/// Decides the mode of `monster` toward `target`.
///
/// A monster is active when it stands on a tile the oracle reports as
/// visible, i.e. when the player can see it.
pub fn assess(
    floor: &DungeonFloor,
    monster: EntityId,
    target: EntityId,
    fov: &dyn VisibilityOracle,
) -> AiState {
    let (Some(monster), Some(target)) = (floor.get(monster), floor.get(target)) else {
        return AiState::Idle;
    };
    if !fov.is_visible(monster.position) {
        return AiState::Idle;
    }
    if monster.position.euclidean_distance(target.position) >= 2.0 {
        AiState::Approach
    } else {
        AiState::Engage
    }
}

/// Runs one turn of a basic monster against `target`.
pub fn take_turn(
    floor: &mut DungeonFloor,
    monster: EntityId,
    target: EntityId,
    fov: &dyn VisibilityOracle,
    rng: &mut StdRng,
) -> Vec<Message> {
    let state = assess(floor, monster, target, fov);
    debug!("Monster {} is {:?}", monster, state);

    match state {
        AiState::Idle => Vec::new(),
        AiState::Approach => move_astar(floor, monster, target, rng),
        AiState::Engage => {
            let Some((attacker, defender)) = floor.pair_mut(monster, target) else {
                return Vec::new();
            };
            if defender.hp() <= 0 {
                return Vec::new();
            }
            attack(attacker, defender, rng).messages
        }
    }
}
