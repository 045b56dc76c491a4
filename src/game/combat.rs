//! # Combat Resolution
//!
//! Dice-roll attacks, damage with a single-fire death hook, healing,
//! experience transfer and level-ups.

use crate::config::{LEVEL_UP_BASE, LEVEL_UP_FACTOR};
use crate::{Color, DeathHook, Entity, Message};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of one attack.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    /// Attack roll minus defense roll; zero or less is a miss
    pub damage: i32,
    pub messages: Vec<Message>,
}

impl AttackOutcome {
    pub fn hit(&self) -> bool {
        self.damage > 0
    }
}

/// Attacks `target` with `attacker`.
///
/// Both sides roll uniformly over `0..=stat` using effective power and
/// defense; the difference is the damage. A defender can therefore be hurt
/// even when its defense exceeds the attacker's power.
pub fn attack(attacker: &mut Entity, target: &mut Entity, rng: &mut StdRng) -> AttackOutcome {
    let attack_roll = rng.gen_range(0..=attacker.power().max(0));
    let defense_roll = rng.gen_range(0..=target.defense().max(0));
    let damage = attack_roll - defense_roll;

    debug!(
        "{} attacks {}: roll {} vs {}",
        attacker.name, target.name, attack_roll, defense_roll
    );

    if damage <= 0 {
        return AttackOutcome {
            damage,
            messages: vec![Message::new(
                format!("{} attacks {} but misses.", attacker.capitalized_name(), target.name),
                Color::WHITE,
            )],
        };
    }

    let mut messages = vec![Message::new(
        format!("{} attacks {}.", attacker.capitalized_name(), target.name),
        Color::YELLOW,
    )];
    let cause = format!("killed by {}", attacker.name);
    messages.extend(take_damage(target, damage, &cause, Some(attacker)));

    AttackOutcome { damage, messages }
}

/// Applies `amount` damage to `target`.
///
/// Non-positive amounts are ignored. When hit points reach zero the
/// killer (if it can fight) receives the target's experience, then the
/// death hook fires and is cleared so it can never fire again.
pub fn take_damage(
    target: &mut Entity,
    amount: i32,
    cause: &str,
    killer: Option<&mut Entity>,
) -> Vec<Message> {
    if amount <= 0 {
        return Vec::new();
    }

    let (hook, xp) = match target.fighter.as_mut() {
        Some(fighter) => {
            fighter.hp -= amount;
            if fighter.hp > 0 {
                return Vec::new();
            }
            match fighter.death.take() {
                Some(hook) => (hook, fighter.xp),
                None => return Vec::new(),
            }
        }
        None => return Vec::new(),
    };

    if let Some(killer_fighter) = killer.and_then(|killer| killer.fighter.as_mut()) {
        killer_fighter.xp += xp;
    }

    vec![fire_death_hook(target, hook, cause)]
}

fn fire_death_hook(entity: &mut Entity, hook: DeathHook, cause: &str) -> Message {
    debug!("{} died: {}", entity.name, cause);
    match hook {
        DeathHook::Monster => {
            let message = Message::new(format!("{} dies.", entity.capitalized_name()), Color::RED);
            entity.glyph = '%';
            entity.color = Color::DARK_RED;
            entity.blocks = false;
            entity.fighter = None;
            entity.ai = None;
            entity.name = format!("corpse ({})", entity.name);
            message
        }
        DeathHook::Player => {
            entity.glyph = '%';
            entity.color = Color::DARK_RED;
            entity.death_cause = Some(cause.to_string());
            Message::new("You died!", Color::RED)
        }
    }
}

/// Restores hit points without exceeding the effective maximum.
pub fn heal(entity: &mut Entity, amount: i32) {
    let max_hp = entity.max_hp();
    if let Some(fighter) = entity.fighter.as_mut() {
        fighter.hp = (fighter.hp + amount).min(max_hp);
    }
}

/// Stat raised on each level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelUpChoice {
    /// +20 maximum and current hit points
    #[default]
    Constitution,
    /// +1 power
    Strength,
    /// +1 defense
    Agility,
}

/// Experience needed to advance from `level`.
pub fn level_up_threshold(level: u32) -> i32 {
    LEVEL_UP_BASE + level as i32 * LEVEL_UP_FACTOR
}

/// Advances the entity's level as long as it holds enough experience.
pub fn check_level_up(entity: &mut Entity, choice: LevelUpChoice) -> Vec<Message> {
    let mut messages = Vec::new();
    let Some(fighter) = entity.fighter.as_mut() else {
        return messages;
    };

    loop {
        let threshold = level_up_threshold(fighter.level);
        if fighter.xp < threshold {
            break;
        }
        fighter.xp -= threshold;
        fighter.level += 1;
        match choice {
            LevelUpChoice::Constitution => {
                fighter.base_max_hp += 20;
                fighter.hp += 20;
            }
            LevelUpChoice::Strength => fighter.base_power += 1,
            LevelUpChoice::Agility => fighter.base_defense += 1,
        }
        messages.push(Message::new(
            format!(
                "Your battle skills grow stronger! You reached level {}!",
                fighter.level
            ),
            Color::YELLOW,
        ));
    }

    messages
}
