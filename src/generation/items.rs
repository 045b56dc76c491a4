//! # Item Generation
//!
//! The level-scaled loot table and the weighted draw that picks from it.

use crate::config::HEAL_AMOUNT;
use crate::{from_dungeon_level, Color, Entity, Equipment, ItemEffect, LevelTable, Position};
use log::warn;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;

/// What an item template turns into once spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Consumable(ItemEffect),
    Gear {
        slot: &'static str,
        power_bonus: i32,
        defense_bonus: i32,
        max_hp_bonus: i32,
    },
}

/// One entry of the loot table.
#[derive(Debug, Clone, Copy)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: Color,
    pub kind: ItemKind,
    /// Draw weight by dungeon level
    pub chances: &'static LevelTable,
}

impl ItemTemplate {
    /// Spawns this template at `position`.
    pub fn spawn(&self, position: Position) -> Entity {
        match self.kind {
            ItemKind::Consumable(effect) => {
                Entity::item(position, self.glyph, self.name, self.color, Some(effect))
            }
            ItemKind::Gear {
                slot,
                power_bonus,
                defense_bonus,
                max_hp_bonus,
            } => Entity::gear(
                position,
                self.glyph,
                self.name,
                self.color,
                Equipment::new(slot, power_bonus, defense_bonus, max_hp_bonus),
            ),
        }
    }
}

/// Every item that can appear on a floor.
pub const ITEM_TABLE: &[ItemTemplate] = &[
    ItemTemplate {
        name: "healing draught",
        glyph: '!',
        color: Color::LIGHT_VIOLET,
        kind: ItemKind::Consumable(ItemEffect::Heal { amount: HEAL_AMOUNT }),
        chances: &[(35, 1)],
    },
    ItemTemplate {
        name: "sword",
        glyph: '/',
        color: Color::LIGHT_GREY,
        kind: ItemKind::Gear {
            slot: "right hand",
            power_bonus: 3,
            defense_bonus: 0,
            max_hp_bonus: 0,
        },
        chances: &[(5, 4)],
    },
    ItemTemplate {
        name: "helmet",
        glyph: '^',
        color: Color::GOLD,
        kind: ItemKind::Gear {
            slot: "head",
            power_bonus: 0,
            defense_bonus: 0,
            max_hp_bonus: 5,
        },
        chances: &[(10, 2)],
    },
    ItemTemplate {
        name: "shield",
        glyph: '[',
        color: Color::DARK_ORANGE,
        kind: ItemKind::Gear {
            slot: "left hand",
            power_bonus: 0,
            defense_bonus: 1,
            max_hp_bonus: 0,
        },
        chances: &[(15, 8)],
    },
];

/// Draws items from [`ITEM_TABLE`] weighted by dungeon level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draw weights of every template at `dungeon_level`.
    pub fn weights(&self, dungeon_level: u32) -> Vec<u32> {
        ITEM_TABLE
            .iter()
            .map(|template| from_dungeon_level(template.chances, dungeon_level))
            .collect()
    }

    /// Picks a template; a healing draught when nothing is weighted in yet.
    pub fn choose(&self, dungeon_level: u32, rng: &mut StdRng) -> &'static ItemTemplate {
        match WeightedIndex::new(self.weights(dungeon_level)) {
            Ok(distribution) => &ITEM_TABLE[distribution.sample(rng)],
            Err(err) => {
                warn!("No item weighted in at level {}: {}", dungeon_level, err);
                &ITEM_TABLE[0]
            }
        }
    }

    /// Creates a random item at `position`.
    pub fn random_item(&self, position: Position, dungeon_level: u32, rng: &mut StdRng) -> Entity {
        self.choose(dungeon_level, rng).spawn(position)
    }
}
