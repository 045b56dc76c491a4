//! # Player Actions
//!
//! The intents the input collaborator hands to the turn scheduler, and
//! whether resolving one consumed game time.

use crate::{Direction, Message};
use serde::{Deserialize, Serialize};

/// One discrete player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerIntent {
    /// Step one tile; bumping into something solid hurts
    Move(Direction),
    /// Hit whatever fights on the adjacent tile
    Attack(Direction),
    /// Pick up the topmost item underfoot
    PickUp,
    /// Use or toggle the inventory entry at this index
    Use(usize),
    /// Drop the inventory entry at this index
    Drop(usize),
    /// Let a turn pass
    Wait,
    /// Take the stairs down
    Descend,
    /// Take the stairs up
    Ascend,
}

/// Whether an intent consumed game time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    /// Time advances and every AI acts
    TookTurn,
    /// Cancelled or rejected; nothing else happens
    NoTurn,
}

/// Result of resolving a single intent before the AI pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub result: ActionResult,
    pub messages: Vec<Message>,
}

impl ActionOutcome {
    pub fn took_turn(messages: Vec<Message>) -> Self {
        Self {
            result: ActionResult::TookTurn,
            messages,
        }
    }

    pub fn no_turn(messages: Vec<Message>) -> Self {
        Self {
            result: ActionResult::NoTurn,
            messages,
        }
    }

    pub fn consumed_turn(&self) -> bool {
        self.result == ActionResult::TookTurn
    }
}
