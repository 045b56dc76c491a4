//! # Game State Module
//!
//! The game session and its turn scheduler.
//!
//! A [`GameSession`] owns everything one run needs: configuration, the
//! current floor, the player's id, the message log, the visibility oracle
//! and the seeded random source. Each call to [`GameSession::run_turn`]
//! resolves one player intent and, if it took game time, advances the clock
//! and gives every monster one turn.

use crate::config::{
    ASCEND_DAMAGE, DLEVEL_SCORE, DLEVEL_XP, FOV_RADIUS, INVENTORY_MAX, MESSAGE_BACKLOG,
    STAIR_TUMBLE_CHANCE, STAIR_TUMBLE_DAMAGE,
};
use crate::generation::utils::create_rng;
use crate::{
    attack, check_level_up, drop_item, equip, pick_up, take_damage, take_turn, use_item, ActionOutcome,
    Color, Direction, DungeonFloor, Entity, EntityId, Equipment, GenerationConfig, Generator,
    GidError, GidResult, LevelUpChoice, Message, MessageLog, PlayerIntent, Position, RaycastFov,
    RoomCorridorGenerator, VisibilityOracle,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything tunable about a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Floor generation parameters, including the run's seed
    pub generation: GenerationConfig,
    pub player_name: String,
    /// Radius handed to the visibility oracle
    pub fov_radius: i32,
    /// Most items the player can carry
    pub inventory_capacity: usize,
    /// Messages kept in the visible backlog
    pub message_backlog: usize,
    /// Stat raised on each character level-up
    pub level_up_choice: LevelUpChoice,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            player_name: "Player".to_string(),
            fov_radius: FOV_RADIUS,
            inventory_capacity: INVENTORY_MAX,
            message_backlog: MESSAGE_BACKLOG,
            level_up_choice: LevelUpChoice::default(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON configuration. Missing fields take defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::GameConfig;
    ///
    /// let config = GameConfig::from_json_str(r#"{"player_name": "Edna", "generation": {"seed": 7}}"#).unwrap();
    /// assert_eq!(config.player_name, "Edna");
    /// assert_eq!(config.generation.seed, 7);
    /// assert_eq!(config.generation.width, 80);
    /// ```
    pub fn from_json_str(json: &str) -> GidResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> GidResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> GidResult<()> {
        self.generation
            .validate()
            .map_err(|err| GidError::InvalidConfig(err.to_string()))?;
        if self.player_name.trim().is_empty() {
            return Err(GidError::InvalidConfig("player_name is empty".to_string()));
        }
        if self.fov_radius < 0 {
            return Err(GidError::InvalidConfig(format!(
                "fov_radius {} is negative",
                self.fov_radius
            )));
        }
        if self.inventory_capacity == 0 {
            return Err(GidError::InvalidConfig(
                "inventory_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whether the run is still going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Playing,
    /// Terminal; no intent is resolved any more
    Dead,
}

/// How a run ended, for whoever keeps the high-score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub name: String,
    pub cause: String,
    pub score: u64,
    pub character_level: u32,
    pub dungeon_level: u32,
    pub turns: u64,
}

impl DeathRecord {
    pub fn to_json(&self) -> GidResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One run of the game.
#[derive(Debug)]
pub struct GameSession<V: VisibilityOracle = RaycastFov> {
    pub config: GameConfig,
    floor: DungeonFloor,
    player_id: EntityId,
    state: RunState,
    time: u64,
    score: u64,
    messages: MessageLog,
    death: Option<DeathRecord>,
    fov: V,
    fov_recompute: bool,
    rng: StdRng,
    generator: RoomCorridorGenerator,
}

impl GameSession<RaycastFov> {
    /// Starts a run with the built-in ray-casting field of view.
    ///
    /// # Examples
    ///
    /// ```
    /// use gid::{GameConfig, GameSession, PlayerIntent, RunState};
    ///
    /// let mut session = GameSession::new(GameConfig::default()).unwrap();
    /// session.run_turn(PlayerIntent::Wait).unwrap();
    /// assert_eq!(session.time(), 1);
    /// assert_eq!(session.state(), RunState::Playing);
    /// ```
    pub fn new(config: GameConfig) -> GidResult<Self> {
        Self::with_oracle(config, RaycastFov::new())
    }
}

impl<V: VisibilityOracle> GameSession<V> {
    /// Starts a run with a caller-supplied visibility oracle.
    pub fn with_oracle(config: GameConfig, fov: V) -> GidResult<Self> {
        Self::with_generator(config, fov, RoomCorridorGenerator::new())
    }

    /// Starts a run with a specific floor generator.
    pub fn with_generator(
        config: GameConfig,
        fov: V,
        generator: RoomCorridorGenerator,
    ) -> GidResult<Self> {
        config.validate()?;
        let mut rng = create_rng(&config.generation);
        let mut floor = generator.generate(&config.generation, 1, &mut rng)?;

        let mut player = Entity::player(config.player_name.clone(), floor.spawn_position());
        player.inventory.push(Entity::gear(
            player.position,
            '/',
            "rolled-up newspaper",
            Color::LIGHT_GREY,
            Equipment::new("right hand", 2, 0, 0),
        ));

        let mut messages = MessageLog::new(config.message_backlog);
        messages.push(Message::new(
            format!("Go, {}! Recover the Golden Pigeon of Nyan!", config.player_name),
            Color::WHITE,
        ));
        messages.extend(equip(&mut player, 0));
        let player_id = floor.admit_player(player);

        info!(
            "New run for {} with seed {}",
            config.player_name, config.generation.seed
        );

        let mut session = Self {
            config,
            floor,
            player_id,
            state: RunState::Playing,
            time: 0,
            score: 0,
            messages,
            death: None,
            fov,
            fov_recompute: true,
            rng,
            generator,
        };
        session.refresh_visibility();
        Ok(session)
    }

    pub fn floor(&self) -> &DungeonFloor {
        &self.floor
    }

    pub fn floor_mut(&mut self) -> &mut DungeonFloor {
        &mut self.floor
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn player(&self) -> Option<&Entity> {
        self.floor.get(self.player_id)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Turns taken so far.
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.messages
    }

    pub fn death_record(&self) -> Option<&DeathRecord> {
        self.death.as_ref()
    }

    pub fn oracle(&self) -> &V {
        &self.fov
    }

    /// Whether the player can currently see `pos`.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.fov.is_visible(pos)
    }

    fn player_mut(&mut self) -> GidResult<&mut Entity> {
        let id = self.player_id;
        self.floor
            .get_mut(id)
            .ok_or_else(|| GidError::InvalidState("Player is not on the floor".to_string()))
    }

    /// Resolves one player intent and, if it took time, the AI pass.
    ///
    /// Returns the messages emitted this turn in order; they are also
    /// appended to the message log. Once the player is dead every call is a
    /// no-op.
    pub fn run_turn(&mut self, intent: PlayerIntent) -> GidResult<Vec<Message>> {
        if self.state == RunState::Dead {
            return Ok(Vec::new());
        }

        let outcome = self.resolve_intent(intent)?;
        let consumed = outcome.consumed_turn();
        let mut messages = outcome.messages;

        if consumed {
            self.time += 1;
            if self.time % 10 == 0 {
                self.score += 1;
            }

            self.refresh_visibility();
            for monster in self.floor.ai_entities() {
                messages.extend(take_turn(
                    &mut self.floor,
                    monster,
                    self.player_id,
                    &self.fov,
                    &mut self.rng,
                ));
            }

            let choice = self.config.level_up_choice;
            let player = self.player_mut()?;
            if player.is_alive() {
                messages.extend(check_level_up(player, choice));
            }
        }

        debug!("Turn {} resolved {:?}: {} messages", self.time, intent, messages.len());
        self.update_run_state();
        self.messages.extend(messages.iter().cloned());
        Ok(messages)
    }

    /// Applies the player's intent without advancing time.
    fn resolve_intent(&mut self, intent: PlayerIntent) -> GidResult<ActionOutcome> {
        let player_id = self.player_id;
        match intent {
            PlayerIntent::Move(direction) => {
                let moved = self.floor.move_by(player_id, direction.to_delta(), &mut self.rng);
                if moved.moved {
                    self.fov_recompute = true;
                }
                Ok(ActionOutcome::took_turn(moved.messages))
            }
            PlayerIntent::Attack(direction) => self.player_attack(direction),
            PlayerIntent::PickUp => Ok(pick_up(
                &mut self.floor,
                player_id,
                self.config.inventory_capacity,
            )),
            PlayerIntent::Use(index) => Ok(use_item(self.player_mut()?, index)),
            PlayerIntent::Drop(index) => Ok(drop_item(&mut self.floor, player_id, index)),
            PlayerIntent::Wait => Ok(ActionOutcome::took_turn(Vec::new())),
            PlayerIntent::Descend => {
                let on_stairs = self.floor.stairs_down().map(|stairs| stairs.position)
                    == self.player().map(|player| player.position);
                if on_stairs {
                    self.descend().map(ActionOutcome::took_turn)
                } else {
                    Ok(ActionOutcome::no_turn(vec![Message::new(
                        "You can't go down on that.",
                        Color::WHITE,
                    )]))
                }
            }
            PlayerIntent::Ascend => {
                let on_stairs = self.floor.stairs_up().map(|stairs| stairs.position)
                    == self.player().map(|player| player.position);
                if !on_stairs {
                    return Ok(ActionOutcome::no_turn(vec![Message::new(
                        "You can't go up here.",
                        Color::WHITE,
                    )]));
                }
                let mut messages = vec![Message::new(
                    "You attempt to climb the stairs but the effort destroys your already frail body.",
                    Color::YELLOW,
                )];
                let player = self.player_mut()?;
                messages.extend(take_damage(
                    player,
                    ASCEND_DAMAGE,
                    "collapsed from over-exertion",
                    None,
                ));
                Ok(ActionOutcome::took_turn(messages))
            }
        }
    }

    /// Attacks the topmost fighter on the adjacent tile in `direction`.
    fn player_attack(&mut self, direction: Direction) -> GidResult<ActionOutcome> {
        let player_id = self.player_id;
        let origin = self.player_mut()?.position;
        let target = self
            .floor
            .get_stuff(origin + direction.to_delta())
            .into_iter()
            .rev()
            .find(|entity| entity.fighter.is_some() && entity.id != player_id)
            .map(|entity| entity.id);

        let Some((player, target)) =
            target.and_then(|target| self.floor.pair_mut(player_id, target))
        else {
            return Ok(ActionOutcome::no_turn(vec![Message::new(
                "You can't hit that.",
                Color::WHITE,
            )]));
        };
        Ok(ActionOutcome::took_turn(
            attack(player, target, &mut self.rng).messages,
        ))
    }

    /// Takes the stairs down to a freshly generated floor.
    ///
    /// Descending pays experience and score scaled by the level being left
    /// and occasionally ends in a tumble.
    fn descend(&mut self) -> GidResult<Vec<Message>> {
        let level = self.floor.dungeon_level;
        let mut messages = Vec::new();

        let player_id = self.player_id;
        let player = self
            .floor
            .get_mut(player_id)
            .ok_or_else(|| GidError::InvalidState("Player is not on the floor".to_string()))?;
        if let Some(fighter) = player.fighter.as_mut() {
            fighter.xp += DLEVEL_XP * level as i32;
        }
        self.score += DLEVEL_SCORE * level as u64;

        if self.rng.gen_bool(STAIR_TUMBLE_CHANCE) {
            messages.push(Message::new("You tumble down the stairs.", Color::ORANGE));
            let damage = self
                .rng
                .gen_range(STAIR_TUMBLE_DAMAGE.0..=STAIR_TUMBLE_DAMAGE.1);
            messages.extend(take_damage(player, damage, "fell down the stairs", None));
        } else {
            messages.push(Message::new(
                "You manage to avoid falling down the stairs.",
                Color::WHITE,
            ));
        }

        let mut next = self
            .generator
            .generate(&self.config.generation, level + 1, &mut self.rng)?;
        let player = self
            .floor
            .remove_entity(player_id)
            .ok_or_else(|| GidError::InvalidState("Player is not on the floor".to_string()))?;
        next.admit_player(player);
        self.floor = next;
        self.fov_recompute = true;

        info!("Descended to dungeon level {}", level + 1);
        Ok(messages)
    }

    /// Recomputes the field of view if the player moved and marks every
    /// visible tile explored.
    pub fn refresh_visibility(&mut self) {
        if !self.fov_recompute {
            return;
        }
        let Some(origin) = self.player().map(|player| player.position) else {
            return;
        };
        self.fov
            .compute(&self.floor.tiles, origin, self.config.fov_radius);
        let visible: Vec<Position> = self
            .floor
            .tiles
            .positions()
            .filter(|pos| self.fov.is_visible(*pos))
            .collect();
        for pos in visible {
            self.floor.tiles.mark_explored(pos);
        }
        self.fov_recompute = false;
    }

    fn update_run_state(&mut self) {
        if self.state == RunState::Dead {
            return;
        }
        let Some(player) = self.floor.get(self.player_id) else {
            return;
        };
        let Some(cause) = player.death_cause.clone() else {
            return;
        };

        let record = DeathRecord {
            name: player.name.clone(),
            cause,
            score: self.score,
            character_level: player.fighter.as_ref().map(|f| f.level).unwrap_or(1),
            dungeon_level: self.floor.dungeon_level,
            turns: self.time,
        };
        info!("{} died on level {}: {}", record.name, record.dungeon_level, record.cause);
        self.death = Some(record);
        self.state = RunState::Dead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_session(seed: u64) -> GameSession {
        let config = GameConfig {
            generation: GenerationConfig::new(seed),
            player_name: "Edna".to_string(),
            ..GameConfig::default()
        };
        GameSession::with_generator(config, RaycastFov::new(), RoomCorridorGenerator::without_population())
            .unwrap()
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn test_new_session_equips_newspaper() {
        let session = quiet_session(1);
        let player = session.player().unwrap();
        assert_eq!(player.power(), 4);
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(Some(player.position), session.floor().stairs_up().map(|s| s.position));

        let log: Vec<&str> = session.message_log().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(log[1], "Equipped rolled-up newspaper on right hand.");
        assert!(session.is_visible(player.position));
        assert!(session.floor().tiles.get(player.position).unwrap().explored);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GameConfig::default();
        assert!(config.validate().is_ok());
        config.inventory_capacity = 0;
        assert!(matches!(config.validate(), Err(GidError::InvalidConfig(_))));

        let config = GameConfig {
            generation: GenerationConfig {
                max_rooms: 0,
                ..GenerationConfig::default()
            },
            ..GameConfig::default()
        };
        assert!(GameSession::new(config).is_err());
        assert!(GameConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_rejected_intents_take_no_time() {
        let mut session = quiet_session(2);
        let on_up_stairs = session.run_turn(PlayerIntent::Descend).unwrap();
        assert_eq!(texts(&on_up_stairs), vec!["You can't go down on that."]);

        let nothing = session.run_turn(PlayerIntent::Attack(Direction::North)).unwrap();
        assert_eq!(texts(&nothing), vec!["You can't hit that."]);

        assert!(!session.run_turn(PlayerIntent::Use(4)).unwrap().is_empty());
        assert!(!session.run_turn(PlayerIntent::Drop(4)).unwrap().is_empty());
        assert_eq!(session.time(), 0);
    }

    #[test]
    fn test_score_accrues_every_ten_turns() {
        let mut session = quiet_session(3);
        for _ in 0..9 {
            session.run_turn(PlayerIntent::Wait).unwrap();
        }
        assert_eq!(session.score(), 0);
        session.run_turn(PlayerIntent::Wait).unwrap();
        assert_eq!(session.time(), 10);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_ascending_is_fatal_and_final() {
        let mut session = quiet_session(4);
        let messages = session.run_turn(PlayerIntent::Ascend).unwrap();
        assert_eq!(messages.last().map(|m| m.text.as_str()), Some("You died!"));
        assert_eq!(session.state(), RunState::Dead);

        let record = session.death_record().unwrap();
        assert_eq!(record.cause, "collapsed from over-exertion");
        assert_eq!(record.name, "Edna");
        assert_eq!(record.turns, 1);
        assert!(record.to_json().unwrap().contains("over-exertion"));

        assert!(session.run_turn(PlayerIntent::Wait).unwrap().is_empty());
        assert_eq!(session.time(), 1);
    }

    #[test]
    fn test_descend_builds_next_level() {
        let mut session = quiet_session(5);
        let stairs = session.floor().stairs_down().map(|s| s.position).unwrap();
        let player_id = session.player_id();
        if let Some(player) = session.floor_mut().get_mut(player_id) {
            player.position = stairs;
        }

        let messages = session.run_turn(PlayerIntent::Descend).unwrap();
        assert!(texts(&messages).iter().any(|t| t.contains("stairs")));
        assert_eq!(session.floor().dungeon_level, 2);
        assert_eq!(session.score(), 100);

        let player = session.player().unwrap();
        assert_eq!(player.fighter.as_ref().map(|f| f.xp), Some(10));
        assert_eq!(Some(player.position), session.floor().stairs_up().map(|s| s.position));
        assert_eq!(player.inventory.len(), 1);
    }

    #[test]
    fn test_player_kills_adjacent_monster_and_gains_xp() {
        let mut session = quiet_session(6);
        let spawn = session.player().unwrap().position;
        let orc = session.floor_mut().add_entity(Entity::monster(
            spawn + Position::new(1, 0),
            'O',
            "orc",
            Color::DARK_GREEN,
        ));

        for _ in 0..100 {
            session.run_turn(PlayerIntent::Attack(Direction::East)).unwrap();
            if session.floor().get(orc).map(|e| e.fighter.is_none()).unwrap_or(true) {
                break;
            }
            if session.state() == RunState::Dead {
                break;
            }
        }

        if session.state() == RunState::Playing {
            let corpse = session.floor().get(orc).unwrap();
            assert_eq!(corpse.name, "corpse (orc)");
            assert_eq!(session.player().and_then(|p| p.fighter.as_ref()).map(|f| f.xp), Some(35));
        }
    }

    #[test]
    fn test_level_up_uses_configured_choice() {
        let mut session = quiet_session(7);
        session.config.level_up_choice = LevelUpChoice::Agility;
        let player_id = session.player_id();
        if let Some(fighter) = session.floor_mut().get_mut(player_id).and_then(|p| p.fighter.as_mut()) {
            fighter.xp = 350;
        }
        let messages = session.run_turn(PlayerIntent::Wait).unwrap();
        assert!(texts(&messages).contains(&"Your battle skills grow stronger! You reached level 2!"));
        assert_eq!(session.player().map(|p| p.defense()), Some(2));
    }
}
