//! # Entities
//!
//! Everything that stands on a floor: the player, monsters, items, stairs.
//!
//! An [`Entity`] is a plain struct carrying optional capabilities
//! ([`Fighter`], [`Item`], [`Equipment`], [`Ai`]) rather than a type
//! hierarchy. Effective combat stats are computed by scanning the entity's
//! own inventory for equipped gear.

use crate::{new_entity_id, EntityId, Layer, Position};
use serde::{Deserialize, Serialize};

/// An RGB color used for glyphs and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREY: Color = Color::rgb(127, 127, 127);
    pub const LIGHT_GREY: Color = Color::rgb(191, 191, 191);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(191, 0, 0);
    pub const CRIMSON: Color = Color::rgb(255, 0, 63);
    pub const ORANGE: Color = Color::rgb(255, 127, 0);
    pub const DARK_ORANGE: Color = Color::rgb(191, 95, 0);
    pub const AMBER: Color = Color::rgb(255, 191, 0);
    pub const DARK_AMBER: Color = Color::rgb(191, 143, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const LIGHT_YELLOW: Color = Color::rgb(255, 255, 115);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const LIGHT_GREEN: Color = Color::rgb(115, 255, 115);
    pub const DARK_GREEN: Color = Color::rgb(0, 191, 0);
    pub const TURQUOISE: Color = Color::rgb(0, 255, 191);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const PURPLE: Color = Color::rgb(191, 0, 255);
    pub const DARK_PURPLE: Color = Color::rgb(143, 0, 191);
    pub const LIGHT_VIOLET: Color = Color::rgb(185, 115, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const PINK: Color = Color::rgb(255, 0, 127);
    pub const GOLD: Color = Color::rgb(229, 191, 0);
    pub const SEPIA: Color = Color::rgb(127, 101, 63);
}

/// What happens when a fighter's hit points run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathHook {
    /// Becomes a passive corpse
    Monster,
    /// Ends the run
    Player,
}

/// Combat statistics of a character.
///
/// `power`, `defense` and `max_hp` here are base values; use the
/// [`Entity`] accessors for effective values including equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub base_max_hp: i32,
    pub hp: i32,
    pub base_defense: i32,
    pub base_power: i32,
    /// Experience carried; handed to whoever kills this fighter
    pub xp: i32,
    /// Character level, raised by experience
    pub level: u32,
    /// Cleared after firing once
    pub death: Option<DeathHook>,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, death: DeathHook) -> Self {
        Self {
            base_max_hp: hp,
            hp,
            base_defense: defense,
            base_power: power,
            xp,
            level: 1,
            death: Some(death),
        }
    }

    /// Shared stat template of every spawned monster.
    pub fn mook() -> Self {
        Self::new(10, 0, 2, 35, DeathHook::Monster)
    }

    /// Starting stats of the player.
    pub fn hero() -> Self {
        Self::new(10, 1, 2, 0, DeathHook::Player)
    }
}

/// Effect applied when a consumable is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    Heal { amount: i32 },
}

/// Marks an entity as something that can be carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub effect: Option<ItemEffect>,
}

/// Wearable gear granting stat bonuses while equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: String,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    pub max_hp_bonus: i32,
    pub is_equipped: bool,
}

impl Equipment {
    pub fn new(slot: impl Into<String>, power_bonus: i32, defense_bonus: i32, max_hp_bonus: i32) -> Self {
        Self {
            slot: slot.into(),
            power_bonus,
            defense_bonus,
            max_hp_bonus,
            is_equipped: false,
        }
    }
}

/// Monster behaviour attached to a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Chase the player while seen, hit when adjacent
    Basic,
}

/// Summed bonuses of all equipped gear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatBonus {
    pub power: i32,
    pub defense: i32,
    pub max_hp: i32,
}

/// Anything with a position on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub name: String,
    pub color: Color,
    /// Whether this entity prevents others from entering its tile
    pub blocks: bool,
    /// Drawn even outside the field of view once explored
    pub always_visible: bool,
    /// Set for the player character only
    pub is_player: bool,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub equipment: Option<Equipment>,
    /// Carried entities; only ever populated for the player
    pub inventory: Vec<Entity>,
    /// How the player died, recorded by the player's death hook
    pub death_cause: Option<String>,
}

impl Entity {
    /// Creates a bare, capability-free entity.
    pub fn new(position: Position, glyph: char, name: impl Into<String>, color: Color, blocks: bool) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph,
            name: name.into(),
            color,
            blocks,
            always_visible: false,
            is_player: false,
            fighter: None,
            ai: None,
            item: None,
            equipment: None,
            inventory: Vec::new(),
            death_cause: None,
        }
    }

    /// Creates the player character.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::{Entity, Layer, Position};
    ///
    /// let hero = Entity::player("Edna", Position::new(3, 4));
    /// assert!(hero.blocks);
    /// assert_eq!(hero.layer(), Layer::Character);
    /// assert_eq!(hero.power(), 2);
    /// ```
    pub fn player(name: impl Into<String>, position: Position) -> Self {
        let mut player = Self::new(position, '@', name, Color::WHITE, true);
        player.is_player = true;
        player.fighter = Some(Fighter::hero());
        player
    }

    /// Creates a monster with the shared stat template and basic AI.
    pub fn monster(position: Position, glyph: char, name: impl Into<String>, color: Color) -> Self {
        let mut monster = Self::new(position, glyph, name, color, true);
        monster.fighter = Some(Fighter::mook());
        monster.ai = Some(Ai::Basic);
        monster
    }

    /// Creates a carriable item with an optional use effect.
    pub fn item(position: Position, glyph: char, name: impl Into<String>, color: Color, effect: Option<ItemEffect>) -> Self {
        let mut item = Self::new(position, glyph, name, color, false);
        item.item = Some(Item { effect });
        item
    }

    /// Creates wearable gear. Equipment is always also an item.
    pub fn gear(position: Position, glyph: char, name: impl Into<String>, color: Color, equipment: Equipment) -> Self {
        let mut gear = Self::item(position, glyph, name, color, None);
        gear.equipment = Some(equipment);
        gear
    }

    /// Creates a stair marker.
    pub fn stairs(position: Position, glyph: char, name: impl Into<String>) -> Self {
        let mut stairs = Self::new(position, glyph, name, Color::WHITE, false);
        stairs.always_visible = true;
        stairs
    }

    /// Stacking layer derived from the capabilities currently attached.
    pub fn layer(&self) -> Layer {
        if self.fighter.is_some() {
            Layer::Character
        } else if self.item.is_some() {
            Layer::Item
        } else if self.always_visible {
            Layer::Tile
        } else {
            Layer::Trash
        }
    }

    /// Name with the first letter upper-cased, for sentence starts.
    pub fn capitalized_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Equipped gear from the inventory.
    pub fn equipped(&self) -> impl Iterator<Item = &Equipment> {
        self.inventory
            .iter()
            .filter_map(|carried| carried.equipment.as_ref())
            .filter(|equipment| equipment.is_equipped)
    }

    /// Index of the inventory entry equipped in `slot`, if any.
    pub fn equipped_in_slot(&self, slot: &str) -> Option<usize> {
        self.inventory.iter().position(|carried| {
            carried
                .equipment
                .as_ref()
                .map(|equipment| equipment.is_equipped && equipment.slot == slot)
                .unwrap_or(false)
        })
    }

    /// Sum of the bonuses of everything currently equipped.
    pub fn equipment_bonus(&self) -> StatBonus {
        self.equipped().fold(StatBonus::default(), |total, equipment| StatBonus {
            power: total.power + equipment.power_bonus,
            defense: total.defense + equipment.defense_bonus,
            max_hp: total.max_hp + equipment.max_hp_bonus,
        })
    }

    /// Effective power; zero for entities that cannot fight.
    pub fn power(&self) -> i32 {
        self.fighter
            .as_ref()
            .map(|fighter| fighter.base_power + self.equipment_bonus().power)
            .unwrap_or(0)
    }

    /// Effective defense; zero for entities that cannot fight.
    pub fn defense(&self) -> i32 {
        self.fighter
            .as_ref()
            .map(|fighter| fighter.base_defense + self.equipment_bonus().defense)
            .unwrap_or(0)
    }

    /// Effective maximum hit points; zero for entities that cannot fight.
    pub fn max_hp(&self) -> i32 {
        self.fighter
            .as_ref()
            .map(|fighter| fighter.base_max_hp + self.equipment_bonus().max_hp)
            .unwrap_or(0)
    }

    pub fn hp(&self) -> i32 {
        self.fighter.as_ref().map(|fighter| fighter.hp).unwrap_or(0)
    }

    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().map(|fighter| fighter.hp > 0).unwrap_or(false)
    }
}
