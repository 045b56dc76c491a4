//! # Encounter Generation
//!
//! Monster species and the per-room scattering of monsters and items.
//!
//! Counts come from level-scaled step tables and each sampled tile is tried
//! exactly once: a blocked or occupied sample is skipped, so the drawn counts
//! are upper bounds rather than guarantees.

use crate::{
    from_dungeon_level, is_blocked_at, Color, Entity, ItemGenerator, LevelTable, Position, Rect,
    TileGrid,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Maximum monsters per room by dungeon level.
pub const MAX_MONSTERS_BY_LEVEL: &LevelTable = &[(2, 1), (3, 4), (5, 6)];

/// Maximum items per room by dungeon level.
pub const MAX_ITEMS_BY_LEVEL: &LevelTable = &[(1, 1), (2, 4)];

/// Name, glyph and color of a monster. Species never affect stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterSpecies {
    pub name: &'static str,
    pub glyph: char,
    pub color: Color,
}

const fn species(name: &'static str, glyph: char, color: Color) -> MonsterSpecies {
    MonsterSpecies { name, glyph, color }
}

/// Every monster that can be spawned, drawn uniformly.
pub const MONSTER_SPECIES: &[MonsterSpecies] = &[
    species("orc", 'O', Color::DARK_GREEN),
    species("goblin", 'g', Color::DARK_GREEN),
    species("demon", '&', Color::CRIMSON),
    species("soldier ant", 'a', Color::WHITE),
    species("kobold", 'k', Color::PURPLE),
    species("crocodile", 'C', Color::GREEN),
    species("dragon", 'D', Color::WHITE),
    species("beaver", 'r', Color::DARK_AMBER),
    species("hobgoblin", 'O', Color::ORANGE),
    species("squirrel", 'r', Color::DARK_ORANGE),
    species("imp", 'i', Color::WHITE),
    species("shoggoth", '0', Color::BLACK),
    species("xenomorph", '&', Color::BLACK),
    species("bandit", 'B', Color::AMBER),
    species("pirate", 'P', Color::WHITE),
    species("ooze", '0', Color::LIGHT_GREEN),
    species("Deep One", '&', Color::TURQUOISE),
    species("giant squid", 'S', Color::PINK),
    species("rat", 'r', Color::YELLOW),
    species("snake", 's', Color::GREEN),
    species("ferret", 'f', Color::AMBER),
    species("wolf", 'w', Color::GREY),
    species("warg", 'w', Color::BLACK),
    species("troll", 'T', Color::DARK_GREEN),
    species("ogre", 'O', Color::TURQUOISE),
    species("mind flayer", 'C', Color::PURPLE),
    species("floating eye", 'E', Color::BLUE),
    species("gargoyle", '&', Color::GREY),
    species("zombie", 'z', Color::SEPIA),
    species("skeleton", 'z', Color::WHITE),
    species("ghoul", 'z', Color::GREEN),
    species("vampire", 'V', Color::DARK_PURPLE),
    species("werewolf", 'W', Color::ORANGE),
    species("fox", 'f', Color::ORANGE),
    species("bear", 'B', Color::DARK_AMBER),
    species("velociraptor", 'v', Color::WHITE),
    species("ghost", 'G', Color::LIGHT_GREY),
    species("unicorn", 'U', Color::WHITE),
    species("boar", 'p', Color::DARK_ORANGE),
    species("cockatrice", 'c', Color::MAGENTA),
    species("tiger", 'f', Color::ORANGE),
    species("gremlin", 'i', Color::RED),
    species("nymph", 'N', Color::CYAN),
    species("mimic", 'M', Color::GOLD),
    species("wumpus", 'W', Color::LIGHT_VIOLET),
    species("bat", 'b', Color::BLACK),
    species("spider", 'x', Color::DARK_PURPLE),
    species("centaur", 'h', Color::DARK_AMBER),
    species("giant", 'T', Color::ORANGE),
    species("elemental", 'E', Color::BLUE),
    species("titan", 'T', Color::MAGENTA),
    species("minotaur", 'M', Color::DARK_AMBER),
    species("lich", 'L', Color::PINK),
    species("mummy", 'z', Color::YELLOW),
    species("naga", 'N', Color::TURQUOISE),
    species("necromancer", 'N', Color::LIGHT_VIOLET),
    species("wraith", 'W', Color::TURQUOISE),
    species("ape", 'A', Color::YELLOW),
    species("golem", 'G', Color::CYAN),
    species("newt", ':', Color::YELLOW),
    species("cyclops", '*', Color::LIGHT_GREEN),
    species("chimera", '&', Color::GREEN),
    species("hydra", 'S', Color::CYAN),
    species("harpy", 'h', Color::TURQUOISE),
    species("griffin", 'G', Color::GOLD),
    species("kraken", 'K', Color::DARK_PURPLE),
    species("basilisk", 'B', Color::TURQUOISE),
    species("manticore", 'M', Color::CRIMSON),
    species("kelpie", 'h', Color::CYAN),
    species("pixie", 'F', Color::PINK),
    species("wendigo", 'W', Color::TURQUOISE),
    species("leprechaun", 'l', Color::GREEN),
    species("gas spore", 'E', Color::GREEN),
    species("clown", 'C', Color::WHITE),
    species("wampa", 'W', Color::WHITE),
];

/// How one room's population went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub monsters: usize,
    pub items: usize,
    /// Samples that landed on a blocked or occupied tile
    pub skipped: usize,
}

/// Scatters monsters and items into freshly carved rooms.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterGenerator {
    items: ItemGenerator,
}

impl EncounterGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a monster of a uniformly chosen species.
    pub fn random_monster(&self, position: Position, rng: &mut StdRng) -> Entity {
        let chosen = MONSTER_SPECIES
            .choose(rng)
            .copied()
            .unwrap_or(species("orc", 'O', Color::DARK_GREEN));
        Entity::monster(position, chosen.glyph, chosen.name, chosen.color)
    }

    /// Populates `room`, appending new entities to `entities`.
    ///
    /// Monsters are placed before items. Every placement samples one
    /// interior tile and is dropped if that tile is blocked or already
    /// holds an entity.
    pub fn populate(
        &self,
        room: &Rect,
        dungeon_level: u32,
        tiles: &TileGrid,
        entities: &mut Vec<Entity>,
        rng: &mut StdRng,
    ) -> PlacementReport {
        let mut report = PlacementReport::default();

        let max_monsters = from_dungeon_level(MAX_MONSTERS_BY_LEVEL, dungeon_level);
        let num_monsters = rng.gen_range(0..=max_monsters);
        for _ in 0..num_monsters {
            let pos = room.random_interior_position(rng);
            if !is_free(tiles, entities, pos) {
                report.skipped += 1;
                continue;
            }
            entities.push(self.random_monster(pos, rng));
            report.monsters += 1;
        }

        let max_items = from_dungeon_level(MAX_ITEMS_BY_LEVEL, dungeon_level);
        let num_items = rng.gen_range(0..=max_items);
        for _ in 0..num_items {
            let pos = room.random_interior_position(rng);
            if !is_free(tiles, entities, pos) {
                report.skipped += 1;
                continue;
            }
            entities.push(self.items.random_item(pos, dungeon_level, rng));
            report.items += 1;
        }

        debug!(
            "Populated room at ({}, {}): {} monsters, {} items, {} skipped",
            room.x1, room.y1, report.monsters, report.items, report.skipped
        );
        report
    }
}

fn is_free(tiles: &TileGrid, entities: &[Entity], pos: Position) -> bool {
    !is_blocked_at(tiles, entities, pos) && !entities.iter().any(|entity| entity.position == pos)
}
