//! # Inventory
//!
//! Picking up, dropping, using and equipping carried items.
//!
//! Items move between the floor's entity list and the carrier's inventory
//! by value, so an item is always owned by exactly one of the two.

use crate::{heal, ActionOutcome, Color, DungeonFloor, Entity, EntityId, ItemEffect, Message};
use log::debug;

/// Equips the inventory entry at `index`.
///
/// Whatever occupies the same slot is dequipped first, so its message
/// comes before the "Equipped" one. Already-equipped gear and entries that
/// are not equipment are left alone.
pub fn equip(owner: &mut Entity, index: usize) -> Vec<Message> {
    let mut messages = Vec::new();
    let Some((name, slot)) = owner.inventory.get(index).and_then(|carried| {
        carried
            .equipment
            .as_ref()
            .filter(|equipment| !equipment.is_equipped)
            .map(|equipment| (carried.name.clone(), equipment.slot.clone()))
    }) else {
        return messages;
    };

    if let Some(incumbent) = owner.equipped_in_slot(&slot) {
        messages.extend(dequip(owner, incumbent));
    }
    if let Some(equipment) = owner.inventory[index].equipment.as_mut() {
        equipment.is_equipped = true;
    }
    messages.push(Message::new(
        format!("Equipped {} on {}.", name, slot),
        Color::LIGHT_GREEN,
    ));
    messages
}

/// Takes off the inventory entry at `index` if it is equipped.
pub fn dequip(owner: &mut Entity, index: usize) -> Vec<Message> {
    let Some(carried) = owner.inventory.get_mut(index) else {
        return Vec::new();
    };
    let name = carried.name.clone();
    match carried.equipment.as_mut() {
        Some(equipment) if equipment.is_equipped => {
            equipment.is_equipped = false;
            vec![Message::new(
                format!("Dequipped {} from {}.", name, equipment.slot),
                Color::LIGHT_YELLOW,
            )]
        }
        _ => Vec::new(),
    }
}

/// Equips or dequips the inventory entry at `index`.
pub fn toggle_equip(owner: &mut Entity, index: usize) -> Vec<Message> {
    let equipped = owner
        .inventory
        .get(index)
        .and_then(|carried| carried.equipment.as_ref())
        .map(|equipment| equipment.is_equipped);
    match equipped {
        Some(true) => dequip(owner, index),
        Some(false) => equip(owner, index),
        None => Vec::new(),
    }
}

fn no_such_slot(index: usize) -> ActionOutcome {
    ActionOutcome::no_turn(vec![Message::new(
        format!("You have nothing in slot {}.", index),
        Color::WHITE,
    )])
}

/// Picks up the topmost item on the carrier's tile.
///
/// Gear is equipped straight away, replacing whatever held its slot.
pub fn pick_up(floor: &mut DungeonFloor, carrier: EntityId, capacity: usize) -> ActionOutcome {
    let Some(pos) = floor.get(carrier).map(|entity| entity.position) else {
        return ActionOutcome::no_turn(Vec::new());
    };
    let Some((item_id, item_name)) = floor
        .get_stuff(pos)
        .into_iter()
        .rev()
        .find(|entity| entity.item.is_some())
        .map(|entity| (entity.id, entity.name.clone()))
    else {
        return ActionOutcome::no_turn(vec![Message::new(
            "There is nothing here to pick up.",
            Color::WHITE,
        )]);
    };

    let carried = floor.get(carrier).map(|entity| entity.inventory.len()).unwrap_or(0);
    if carried >= capacity {
        return ActionOutcome::no_turn(vec![Message::new(
            format!("Your inventory is full, cannot pick up {}.", item_name),
            Color::ORANGE,
        )]);
    }

    let Some(item) = floor.remove_entity(item_id) else {
        return ActionOutcome::no_turn(Vec::new());
    };
    match floor.get_mut(carrier) {
        Some(owner) => {
            let is_gear = item.equipment.is_some();
            owner.inventory.push(item);
            let mut messages = vec![Message::new(
                format!("You picked up {}.", item_name),
                Color::WHITE,
            )];
            if is_gear {
                let index = owner.inventory.len() - 1;
                messages.extend(equip(owner, index));
            }
            debug!("{} picked up {}", owner.name, item_name);
            ActionOutcome::took_turn(messages)
        }
        None => {
            floor.add_entity(item);
            ActionOutcome::no_turn(Vec::new())
        }
    }
}

/// Drops the inventory entry at `index` onto the carrier's tile.
pub fn drop_item(floor: &mut DungeonFloor, carrier: EntityId, index: usize) -> ActionOutcome {
    let Some(owner) = floor.get_mut(carrier) else {
        return ActionOutcome::no_turn(Vec::new());
    };
    if index >= owner.inventory.len() {
        return no_such_slot(index);
    }

    let mut messages = dequip(owner, index);
    let mut item = owner.inventory.remove(index);
    item.position = owner.position;
    messages.push(Message::new(
        format!("You dropped {}.", item.name),
        Color::YELLOW,
    ));
    floor.add_entity(item);
    ActionOutcome::took_turn(messages)
}

/// Uses the inventory entry at `index`.
///
/// Gear toggles between equipped and not. Consumables apply their effect
/// and are used up. Anything else just wastes the turn.
pub fn use_item(user: &mut Entity, index: usize) -> ActionOutcome {
    let Some(carried) = user.inventory.get(index) else {
        return no_such_slot(index);
    };
    if carried.equipment.is_some() {
        return ActionOutcome::took_turn(toggle_equip(user, index));
    }

    let effect = carried.item.as_ref().and_then(|item| item.effect);
    match effect {
        None => ActionOutcome::took_turn(vec![Message::new(
            format!("The {} cannot be used.", carried.name),
            Color::WHITE,
        )]),
        Some(ItemEffect::Heal { amount }) => {
            let used = user.inventory.remove(index);
            heal(user, amount);
            ActionOutcome::took_turn(vec![Message::new(
                format!("You have {}, as a treat.", used.name),
                Color::GREEN,
            )])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::floor::open_floor;
    use crate::{Equipment, Position};

    fn gear(name: &str, slot: &str, power: i32) -> Entity {
        Entity::gear(Position::new(0, 0), '/', name, Color::GREY, Equipment::new(slot, power, 0, 0))
    }

    fn is_equipped(entity: &Entity, index: usize) -> bool {
        entity.inventory[index]
            .equipment
            .as_ref()
            .map(|equipment| equipment.is_equipped)
            .unwrap_or(false)
    }

    #[test]
    fn test_equip_replaces_slot_incumbent() {
        let mut hero = Entity::player("hero", Position::new(0, 0));
        hero.inventory.push(gear("club", "right hand", 1));
        hero.inventory.push(gear("sword", "right hand", 3));

        equip(&mut hero, 0);
        assert_eq!(hero.power(), 3);

        let messages = equip(&mut hero, 1);
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Dequipped club from right hand.", "Equipped sword on right hand."]);
        assert!(!is_equipped(&hero, 0));
        assert!(is_equipped(&hero, 1));
        assert_eq!(hero.power(), 5);
    }

    #[test]
    fn test_equip_ignores_equipped_and_plain_items() {
        let mut hero = Entity::player("hero", Position::new(0, 0));
        hero.inventory.push(gear("club", "right hand", 1));
        hero.inventory.push(Entity::item(Position::new(0, 0), '?', "pebble", Color::GREY, None));
        equip(&mut hero, 0);
        assert!(equip(&mut hero, 0).is_empty());
        assert!(equip(&mut hero, 1).is_empty());
        assert!(equip(&mut hero, 7).is_empty());
    }

    #[test]
    fn test_toggle_equip_round_trip() {
        let mut hero = Entity::player("hero", Position::new(0, 0));
        hero.inventory.push(gear("club", "right hand", 1));
        toggle_equip(&mut hero, 0);
        assert!(is_equipped(&hero, 0));
        let messages = toggle_equip(&mut hero, 0);
        assert_eq!(messages[0].text, "Dequipped club from right hand.");
        assert_eq!(hero.power(), 2);
    }

    #[test]
    fn test_pick_up_takes_topmost_item() {
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        let spot = Position::new(2, 2);
        floor.add_entity(Entity::item(spot, '!', "healing draught", Color::PINK, Some(ItemEffect::Heal { amount: 10 })));

        let outcome = pick_up(&mut floor, id, 26);
        assert!(outcome.consumed_turn());
        assert_eq!(outcome.messages[0].text, "You picked up healing draught.");
        assert_eq!(floor.get(id).map(|p| p.inventory.len()), Some(1));
        assert!(floor.get_stuff(spot).iter().all(|e| e.item.is_none()));

        let outcome = pick_up(&mut floor, id, 26);
        assert!(!outcome.consumed_turn());
    }

    #[test]
    fn test_pick_up_rejected_when_full() {
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        floor.add_entity(gear("sword", "right hand", 3));
        if let Some(player) = floor.get_mut(id) {
            player.position = Position::new(0, 0);
            for i in 0..3 {
                player.inventory.push(Entity::item(Position::new(0, 0), '?', format!("rock {}", i), Color::GREY, None));
            }
        }

        let outcome = pick_up(&mut floor, id, 3);
        assert!(!outcome.consumed_turn());
        assert_eq!(outcome.messages[0].text, "Your inventory is full, cannot pick up sword.");
        assert_eq!(floor.get(id).map(|p| p.inventory.len()), Some(3));
        assert_eq!(floor.get_stuff(Position::new(0, 0)).len(), 2);
    }

    #[test]
    fn test_drop_dequips_and_returns_item_to_floor() {
        let mut floor = open_floor();
        let id = floor.admit_player(Entity::player("hero", Position::new(0, 0)));
        if let Some(player) = floor.get_mut(id) {
            player.inventory.push(gear("club", "right hand", 1));
            equip(player, 0);
        }

        let outcome = drop_item(&mut floor, id, 0);
        let texts: Vec<&str> = outcome.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Dequipped club from right hand.", "You dropped club."]);
        let dropped = floor.get_stuff(Position::new(2, 2));
        assert!(dropped.iter().any(|e| e.name == "club"));
        assert_eq!(floor.get(id).map(|p| p.power()), Some(2));

        assert!(!drop_item(&mut floor, id, 0).consumed_turn());
    }

    #[test]
    fn test_use_heals_and_consumes() {
        let mut hero = Entity::player("hero", Position::new(0, 0));
        hero.inventory.push(Entity::item(Position::new(0, 0), '!', "healing draught", Color::PINK, Some(ItemEffect::Heal { amount: 10 })));
        if let Some(fighter) = hero.fighter.as_mut() {
            fighter.hp = 2;
        }
        let outcome = use_item(&mut hero, 0);
        assert!(outcome.consumed_turn());
        assert_eq!(outcome.messages[0].text, "You have healing draught, as a treat.");
        assert_eq!(hero.hp(), 10);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn test_use_without_effect_and_bad_index() {
        let mut hero = Entity::player("hero", Position::new(0, 0));
        hero.inventory.push(Entity::item(Position::new(0, 0), '?', "pebble", Color::GREY, None));
        let outcome = use_item(&mut hero, 0);
        assert!(outcome.consumed_turn());
        assert_eq!(outcome.messages[0].text, "The pebble cannot be used.");
        assert_eq!(hero.inventory.len(), 1);

        assert!(!use_item(&mut hero, 5).consumed_turn());
    }
}
