//! Integration tests for the turn scheduler.

use gid::{
    Color, Direction, Entity, Equipment, GameConfig, GameSession, GenerationConfig,
    PlayerIntent, Position, RaycastFov, RoomCorridorGenerator, RunState,
};

fn quiet_session(seed: u64) -> GameSession {
    let config = GameConfig {
        generation: GenerationConfig::new(seed),
        ..GameConfig::default()
    };
    GameSession::with_generator(
        config,
        RaycastFov::new(),
        RoomCorridorGenerator::without_population(),
    )
    .expect("Failed to start session")
}

fn texts(messages: &[gid::Message]) -> Vec<String> {
    messages.iter().map(|m| m.text.clone()).collect()
}

/// Picking up gear for an occupied slot swaps it in.
#[test]
fn test_pick_up_gear_replaces_equipped_slot() {
    let mut session = quiet_session(11);
    let here = session.player().unwrap().position;
    session.floor_mut().add_entity(Entity::gear(
        here,
        '/',
        "sword",
        Color::LIGHT_GREY,
        Equipment::new("right hand", 3, 0, 0),
    ));

    let messages = session.run_turn(PlayerIntent::PickUp).unwrap();
    assert_eq!(
        texts(&messages),
        vec![
            "You picked up sword.",
            "Dequipped rolled-up newspaper from right hand.",
            "Equipped sword on right hand.",
        ]
    );

    let player = session.player().unwrap();
    let newspaper = player.inventory[0].equipment.as_ref().unwrap();
    let sword = player.inventory[1].equipment.as_ref().unwrap();
    assert!(!newspaper.is_equipped);
    assert!(sword.is_equipped);
    assert_eq!(player.power(), 5);
    assert_eq!(session.time(), 1);
}

/// A full pack refuses the pickup and no time passes.
#[test]
fn test_pick_up_with_full_inventory_is_rejected() {
    let mut session = quiet_session(12);
    let player_id = session.player_id();
    let here = session.player().unwrap().position;
    if let Some(player) = session.floor_mut().get_mut(player_id) {
        while player.inventory.len() < 26 {
            let n = player.inventory.len();
            player
                .inventory
                .push(Entity::item(here, '*', format!("pebble {}", n), Color::GREY, None));
        }
    }
    session
        .floor_mut()
        .add_entity(Entity::item(here, '!', "healing draught", Color::LIGHT_VIOLET, None));

    let messages = session.run_turn(PlayerIntent::PickUp).unwrap();
    assert_eq!(
        texts(&messages),
        vec!["Your inventory is full, cannot pick up healing draught."]
    );
    assert_eq!(session.time(), 0);
    assert_eq!(session.player().map(|p| p.inventory.len()), Some(26));
    assert!(session
        .floor()
        .get_stuff(here)
        .iter()
        .any(|e| e.name == "healing draught"));
}

#[test]
fn test_walking_into_a_wall_hurts_and_costs_a_turn() {
    let mut session = quiet_session(13);
    let mut hp_before = session.player().unwrap().hp();

    // walk west until the room wall stops us
    let mut bumped = None;
    for _ in 0..100 {
        let messages = session.run_turn(PlayerIntent::Move(Direction::West)).unwrap();
        if let Some(first) = messages.first() {
            bumped = Some(first.text.clone());
            break;
        }
        hp_before = session.player().unwrap().hp();
    }

    assert_eq!(bumped.as_deref(), Some("Ouch! You blunder into a wall."));
    let lost = hp_before - session.player().unwrap().hp();
    assert!((1..=5).contains(&lost));
}

#[test]
fn test_messages_reach_the_capped_log() {
    let mut session = quiet_session(14);
    for _ in 0..10 {
        session.run_turn(PlayerIntent::Descend).unwrap();
    }
    let log = session.message_log();
    assert_eq!(log.len(), 5);
    assert!(log.iter().all(|m| m.text == "You can't go down on that."));
    assert_eq!(session.time(), 0);
}

#[test]
fn test_death_stops_the_clock() {
    let mut session = quiet_session(15);
    for _ in 0..3 {
        session.run_turn(PlayerIntent::Wait).unwrap();
    }
    session.run_turn(PlayerIntent::Ascend).unwrap();
    assert_eq!(session.state(), RunState::Dead);

    let record = session.death_record().cloned().unwrap();
    assert_eq!(record.turns, 4);
    assert_eq!(record.dungeon_level, 1);
    assert_eq!(record.character_level, 1);

    for intent in [PlayerIntent::Wait, PlayerIntent::Move(Direction::North), PlayerIntent::PickUp] {
        assert!(session.run_turn(intent).unwrap().is_empty());
    }
    assert_eq!(session.time(), 4);
    assert_eq!(session.death_record(), Some(&record));
}

#[test]
fn test_dropping_and_using_gear() {
    let mut session = quiet_session(16);
    let here = session.player().unwrap().position;

    let messages = session.run_turn(PlayerIntent::Use(0)).unwrap();
    assert_eq!(texts(&messages), vec!["Dequipped rolled-up newspaper from right hand."]);
    assert_eq!(session.player().map(|p| p.power()), Some(2));

    let messages = session.run_turn(PlayerIntent::Drop(0)).unwrap();
    assert_eq!(texts(&messages), vec!["You dropped rolled-up newspaper."]);
    assert!(session.player().unwrap().inventory.is_empty());
    assert!(session
        .floor()
        .get_stuff(here)
        .iter()
        .any(|e| e.name == "rolled-up newspaper"));
    assert_eq!(session.time(), 2);
}

#[test]
fn test_monsters_in_view_close_in() {
    let mut session = quiet_session(17);
    let here = session.player().unwrap().position;
    let spot = here + Position::new(2, 0);
    let rat = session
        .floor_mut()
        .add_entity(Entity::monster(spot, 'r', "rat", Color::YELLOW));

    session.run_turn(PlayerIntent::Wait).unwrap();
    let moved_to = session.floor().get(rat).map(|e| e.position).unwrap();
    assert_eq!(moved_to.chebyshev_distance(here), 1);
}
