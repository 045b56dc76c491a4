//! Integration tests for attack resolution, death hooks and experience.

use gid::{
    attack, check_level_up, take_damage, Color, Entity, LevelUpChoice, Position,
};
use rand::{rngs::StdRng, SeedableRng};

fn rat() -> Entity {
    Entity::monster(Position::new(5, 5), 'r', "rat", Color::YELLOW)
}

/// An unequipped hero (power 2) against defense 0 deals 0..=2 damage and
/// every miss message matches a non-positive roll.
#[test]
fn test_attack_damage_distribution() {
    let mut rng = StdRng::seed_from_u64(10_000);
    let mut hero = Entity::player("hero", Position::new(4, 5));
    assert_eq!((hero.power(), hero.defense()), (2, 1));

    let mut seen = [0usize; 3];
    for _ in 0..10_000 {
        let mut target = rat();
        let outcome = attack(&mut hero, &mut target, &mut rng);

        assert!((0..=2).contains(&outcome.damage));
        seen[outcome.damage as usize] += 1;

        let missed = outcome.messages[0].text.ends_with("but misses.");
        assert_eq!(missed, outcome.damage <= 0);
        assert_eq!(missed, !outcome.hit());
        if outcome.hit() {
            assert_eq!(target.hp(), 10 - outcome.damage);
        } else {
            assert_eq!(target.hp(), 10);
        }
    }
    assert!(seen.iter().all(|&count| count > 0));
}

#[test]
fn test_kill_transfers_experience_once() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut hero = Entity::player("hero", Position::new(4, 5));
    let mut target = rat();

    let mut deaths = 0;
    for _ in 0..500 {
        let outcome = attack(&mut hero, &mut target, &mut rng);
        deaths += outcome
            .messages
            .iter()
            .filter(|m| m.text == "Rat dies.")
            .count();
        if target.fighter.is_none() {
            break;
        }
    }

    assert_eq!(deaths, 1);
    assert_eq!(target.name, "corpse (rat)");
    assert_eq!(target.glyph, '%');
    assert!(!target.blocks);
    assert!(target.ai.is_none());
    assert_eq!(hero.fighter.as_ref().map(|f| f.xp), Some(35));
}

#[test]
fn test_player_death_records_cause_and_fires_once() {
    let mut hero = Entity::player("hero", Position::new(1, 1));
    let messages = take_damage(&mut hero, 25, "killed by a rat", None);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "You died!");
    assert_eq!(hero.death_cause.as_deref(), Some("killed by a rat"));
    assert_eq!(hero.glyph, '%');

    assert!(take_damage(&mut hero, 25, "overkill", None).is_empty());
    assert_eq!(hero.death_cause.as_deref(), Some("killed by a rat"));
}

#[test]
fn test_level_up_chains_through_thresholds() {
    let mut hero = Entity::player("hero", Position::new(1, 1));
    if let Some(fighter) = hero.fighter.as_mut() {
        // 350 for level 1, 500 for level 2
        fighter.xp = 900;
    }
    let messages = check_level_up(&mut hero, LevelUpChoice::Constitution);
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[1].text,
        "Your battle skills grow stronger! You reached level 3!"
    );

    let fighter = hero.fighter.as_ref().unwrap();
    assert_eq!(fighter.level, 3);
    assert_eq!(fighter.xp, 50);
    assert_eq!(hero.max_hp(), 50);
    assert_eq!(hero.hp(), 50);
}
