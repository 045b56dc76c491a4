//! # Dungeon Floor
//!
//! One dungeon level: its tile grid, the ordered entity list, the rooms it
//! was built from and the two stair markers.

use crate::config::WALL_BUMP_DAMAGE;
use crate::{
    take_damage, Color, Entity, EntityId, GidError, GidResult, Message, Position, Rect, TileGrid,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Name of the marker placed where the player arrives.
pub const STAIRS_UP_NAME: &str = "stairs up";
/// Name of the marker leading one level deeper.
pub const STAIRS_DOWN_NAME: &str = "stairs down";

/// Tile-or-entity blocking over a grid and an entity slice.
///
/// Used by [`DungeonFloor::is_blocked`] and by entity placement while a
/// floor is still being assembled.
pub fn is_blocked_at(tiles: &TileGrid, entities: &[Entity], pos: Position) -> bool {
    tiles.is_blocked(pos)
        || entities
            .iter()
            .any(|entity| entity.blocks && entity.position == pos)
}

/// Result of trying to move an entity one step.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub messages: Vec<Message>,
}

/// One level's complete state.
#[derive(Debug, Clone)]
pub struct DungeonFloor {
    pub tiles: TileGrid,
    /// Accepted rooms in generation order; the first is the spawn room
    pub rooms: Vec<Rect>,
    pub dungeon_level: u32,
    entities: Vec<Entity>,
    stairs_up: EntityId,
    stairs_down: EntityId,
}

impl DungeonFloor {
    /// Assembles a floor, locating the stair markers by name.
    pub fn new(
        tiles: TileGrid,
        rooms: Vec<Rect>,
        entities: Vec<Entity>,
        dungeon_level: u32,
    ) -> GidResult<Self> {
        let find = |name: &str| {
            entities
                .iter()
                .find(|entity| entity.name == name)
                .map(|entity| entity.id)
                .ok_or_else(|| GidError::InvalidState(format!("Floor has no {}", name)))
        };
        let stairs_up = find(STAIRS_UP_NAME)?;
        let stairs_down = find(STAIRS_DOWN_NAME)?;

        Ok(Self {
            tiles,
            rooms,
            dungeon_level,
            entities,
            stairs_up,
            stairs_down,
        })
    }

    /// Entities in insertion order, which is also draw order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    /// Mutable access to two distinct entities at once.
    pub fn pair_mut(&mut self, first: EntityId, second: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        let a = self.index_of(first)?;
        let b = self.index_of(second)?;
        if a == b {
            return None;
        }
        if a < b {
            let (head, tail) = self.entities.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.entities.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Removes an entity, transferring ownership to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    /// Places the player on the up stairs and puts it first in the list.
    pub fn admit_player(&mut self, mut player: Entity) -> EntityId {
        player.position = self.spawn_position();
        let id = player.id;
        self.entities.insert(0, player);
        id
    }

    /// Center of the spawn room, where the up stairs stand.
    pub fn spawn_position(&self) -> Position {
        self.stairs_up().map(|stairs| stairs.position).unwrap_or_else(|| {
            self.rooms
                .first()
                .map(|room| room.center())
                .unwrap_or(Position::new(0, 0))
        })
    }

    pub fn stairs_up(&self) -> Option<&Entity> {
        self.get(self.stairs_up)
    }

    pub fn stairs_down(&self) -> Option<&Entity> {
        self.get(self.stairs_down)
    }

    /// The single authority consulted before any movement.
    pub fn is_blocked(&self, pos: Position) -> bool {
        is_blocked_at(&self.tiles, &self.entities, pos)
    }

    /// Whether any entity at all stands on the tile.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.entities.iter().any(|entity| entity.position == pos)
    }

    /// First blocking entity on a tile.
    pub fn blocker_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.blocks && entity.position == pos)
    }

    /// Everything on a tile ordered by layer, lowest first.
    ///
    /// Entities on the same layer keep their list order.
    pub fn get_stuff(&self, pos: Position) -> Vec<&Entity> {
        let mut stuff: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|entity| entity.position == pos)
            .collect();
        stuff.sort_by_key(|entity| entity.layer());
        stuff
    }

    /// Ids of every entity that currently has an AI, in list order.
    pub fn ai_entities(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|entity| entity.ai.is_some())
            .map(|entity| entity.id)
            .collect()
    }

    /// Moves an entity by `delta` unless the destination is blocked.
    ///
    /// A blocked player blunders into the obstacle and takes a little
    /// damage; anyone else simply stays put.
    pub fn move_by(&mut self, id: EntityId, delta: Position, rng: &mut StdRng) -> MoveOutcome {
        let Some(origin) = self.get(id).map(|entity| entity.position) else {
            return MoveOutcome {
                moved: false,
                messages: Vec::new(),
            };
        };
        let destination = origin + delta;

        if !self.is_blocked(destination) {
            if let Some(entity) = self.get_mut(id) {
                entity.position = destination;
            }
            return MoveOutcome {
                moved: true,
                messages: Vec::new(),
            };
        }

        let blocker_name = self
            .blocker_at(destination)
            .map(|blocker| blocker.name.clone())
            .unwrap_or_else(|| "a wall".to_string());

        let mut messages = Vec::new();
        if let Some(entity) = self.get_mut(id).filter(|entity| entity.is_player) {
            messages.push(Message::new(
                format!("Ouch! You blunder into {}.", blocker_name),
                Color::ORANGE,
            ));
            let damage = rng.gen_range(WALL_BUMP_DAMAGE.0..=WALL_BUMP_DAMAGE.1);
            let cause = format!("running into {}", blocker_name);
            messages.extend(take_damage(entity, damage, &cause, None));
        }

        MoveOutcome {
            moved: false,
            messages,
        }
    }
}

/// A 10×10 floor with an open 8×8 interior and stairs at (2,2) / (7,7).
#[cfg(test)]
pub(crate) fn open_floor() -> DungeonFloor {
    let mut tiles = TileGrid::new(10, 10);
    let room = Rect::new(0, 0, 9, 9);
    for pos in room.interior_positions() {
        tiles.carve(pos);
    }
    let entities = vec![
        Entity::stairs(Position::new(2, 2), '<', STAIRS_UP_NAME),
        Entity::stairs(Position::new(7, 7), '>', STAIRS_DOWN_NAME),
    ];
    DungeonFloor::new(tiles, vec![room], entities, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Equipment, Layer};
    use rand::SeedableRng;

    #[test]
    fn test_floor_requires_both_stairs() {
        let tiles = TileGrid::new(5, 5);
        let entities = vec![Entity::stairs(Position::new(1, 1), '<', STAIRS_UP_NAME)];
        assert!(DungeonFloor::new(tiles, Vec::new(), entities, 1).is_err());
    }

    #[test]
    fn test_is_blocked_considers_tiles_and_blockers() {
        let mut floor = open_floor();
        assert!(floor.is_blocked(Position::new(0, 0)));
        assert!(!floor.is_blocked(Position::new(4, 4)));
        // stairs do not block
        assert!(!floor.is_blocked(Position::new(2, 2)));

        floor.add_entity(Entity::monster(Position::new(4, 4), 'r', "rat", Color::DARK_RED));
        assert!(floor.is_blocked(Position::new(4, 4)));
        assert!(floor.is_occupied(Position::new(2, 2)));
    }

    #[test]
    fn test_get_stuff_orders_by_layer() {
        let mut floor = open_floor();
        let pos = Position::new(5, 5);
        floor.add_entity(Entity::monster(pos, 'r', "rat", Color::DARK_RED));
        floor.add_entity(Entity::gear(pos, '/', "sword", Color::GREY, Equipment::new("right hand", 3, 0, 0)));
        floor.add_entity(Entity::new(pos, '%', "corpse (bat)", Color::DARK_RED, false));

        let layers: Vec<Layer> = floor.get_stuff(pos).iter().map(|e| e.layer()).collect();
        assert_eq!(layers, vec![Layer::Trash, Layer::Item, Layer::Character]);
        assert!(floor.get_stuff(Position::new(6, 6)).is_empty());
    }

    #[test]
    fn test_admit_player_spawns_on_up_stairs() {
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        assert_eq!(floor.entities()[0].id, id);
        assert_eq!(floor.get(id).map(|p| p.position), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_pair_mut_returns_requested_order() {
        let mut floor = open_floor();
        let a = floor.add_entity(Entity::monster(Position::new(3, 3), 'a', "ant", Color::DARK_RED));
        let b = floor.add_entity(Entity::monster(Position::new(3, 4), 'b', "bat", Color::BLACK));
        let (first, second) = floor.pair_mut(b, a).unwrap();
        assert_eq!(first.name, "bat");
        assert_eq!(second.name, "ant");
        assert!(floor.pair_mut(a, a).is_none());
    }

    #[test]
    fn test_player_blunders_into_walls() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        if let Some(player) = floor.get_mut(id) {
            player.position = Position::new(1, 1);
        }

        let outcome = floor.move_by(id, Position::new(-1, 0), &mut rng);
        assert!(!outcome.moved);
        assert_eq!(outcome.messages[0].text, "Ouch! You blunder into a wall.");
        let hp = floor.get(id).map(|p| p.hp()).unwrap();
        assert!((5..=9).contains(&hp));

        let outcome = floor.move_by(id, Position::new(1, 0), &mut rng);
        assert!(outcome.moved);
        assert_eq!(floor.get(id).map(|p| p.position), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_monsters_bump_silently() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut floor = open_floor();
        let id = floor.add_entity(Entity::monster(Position::new(1, 1), 'r', "rat", Color::DARK_RED));
        let outcome = floor.move_by(id, Position::new(0, -1), &mut rng);
        assert!(!outcome.moved);
        assert!(outcome.messages.is_empty());
        assert_eq!(floor.get(id).map(|m| m.hp()), Some(10));
    }

    #[test]
    fn test_player_names_blocking_monster() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        floor.add_entity(Entity::monster(Position::new(3, 2), 'k', "kobold", Color::PURPLE));
        let outcome = floor.move_by(id, Position::new(1, 0), &mut rng);
        assert_eq!(outcome.messages[0].text, "Ouch! You blunder into kobold.");
    }
}
