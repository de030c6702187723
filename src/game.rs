//! Falling-character gameplay.
//!
//! A [`Session`] is one attempt at one level. It owns the shuffled working list, the
//! characters currently on screen, score and lives. Time only moves through
//! [`Session::tick`]: each tick first advances every falling character, then checks
//! for completion, then evaluates the spawn countdown. Removing a character drops its
//! fall accumulator with it, so no timer outlives its owner.
//!
//! Observable changes are queued as [`GameEvent`]s for the screen controller to drain.

use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::dataset::{Character, character_pool};
use crate::error::GameError;
use crate::levels::{self, LevelConfig};
use crate::pinyin;
use crate::scoring::{ScoreReward, calculate_score};
use crate::shuffle::pick_working_set;

/// A character on its way to the base.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterInGame {
    pub character: Character,
    /// Horizontal position in percent; starts off-screen right and decreases.
    pub x_position: f64,
    /// Vertical lane in percent.
    pub y_position: f64,
    pub speed: f64,
    /// Wrong submissions made while this character was the focus.
    pub attempt_count: u32,
    pub is_active: bool,
    pub unique_id: String,
    serial: u64,
    fall_elapsed_ms: f64,
}

/// Per-level counters and the on-screen characters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameState {
    pub current_level: u32,
    /// Index of the next unspawned character in the working list.
    pub current_character_index: usize,
    pub score: u32,
    pub correct_count: u32,
    /// Every non-blank submission made during the level.
    pub attempt_count: u32,
    pub total_characters: usize,
    pub is_game_active: bool,
    pub is_paused: bool,
    pub characters_in_game: Vec<CharacterInGame>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Active,
    Complete,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient message shown after a submission or at game over.
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub emoji: &'static str,
    pub kind: FeedbackKind,
    remaining_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Spawned { unique_id: String },
    Matched { unique_id: String, reward: ScoreReward },
    WrongAnswer { unique_id: String, attempt_count: u32 },
    Missed { unique_id: String, lives_left: u32 },
    GameOver,
    LevelComplete { score: u32, accuracy: f64 },
    /// The game-over delay elapsed; leave for level selection.
    ExitToLevelSelect,
    /// The completion delay elapsed; show the results.
    ShowResults,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing on screen, paused or the level is over.
    Ignored,
    Correct(ScoreReward),
    Wrong,
}

pub struct Session {
    config: GameConfig,
    level: &'static LevelConfig,
    state: GameState,
    working: Vec<Character>,
    lives: u32,
    phase: GamePhase,
    rng: StdRng,
    next_serial: u64,
    spawn_timer_ms: f64,
    exit_timer_ms: Option<f64>,
    feedback: Option<Feedback>,
    struggled: Vec<Character>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start `level_number` with a working list drawn from the built-in dataset.
    pub fn new(level_number: u32, config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        Self::from_pool(level_number, character_pool(), config, rng)
    }

    /// Start `level_number` with a working list drawn from `pool`.
    pub fn from_pool(
        level_number: u32,
        pool: &[Character],
        config: GameConfig,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        let level = levels::level(level_number).ok_or(GameError::UnknownLevel(level_number))?;
        let working = pick_working_set(pool, level.character_count, &mut rng);
        info!(
            "level {} ({}) started with {} characters",
            level.level,
            level.name,
            working.len()
        );
        let state = GameState {
            current_level: level.level,
            total_characters: working.len(),
            is_game_active: true,
            ..GameState::default()
        };
        Ok(Self {
            lives: config.start_lives,
            config,
            level,
            state,
            working,
            phase: GamePhase::Active,
            rng,
            next_serial: 0,
            spawn_timer_ms: 0.0,
            exit_timer_ms: None,
            feedback: None,
            struggled: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn level(&self) -> &'static LevelConfig {
        self.level
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn characters(&self) -> &[CharacterInGame] {
        &self.state.characters_in_game
    }

    pub fn working_list(&self) -> &[Character] {
        &self.working
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// `(correct, total)` for the progress bar.
    pub fn progress(&self) -> (u32, usize) {
        (self.state.correct_count, self.state.total_characters)
    }

    /// Correct answers over the level's character count, in percent.
    pub fn accuracy(&self) -> f64 {
        if self.state.total_characters == 0 {
            return 0.0;
        }
        self.state.correct_count as f64 / self.state.total_characters as f64 * 100.0
    }

    /// Characters that drew at least one wrong submission this level.
    pub fn struggled_characters(&self) -> &[Character] {
        &self.struggled
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pause(&mut self) {
        self.state.is_paused = true;
    }

    pub fn resume(&mut self) {
        self.state.is_paused = false;
    }

    /// The character the learner is most likely aiming at: closest to the base,
    /// oldest first on ties.
    pub fn focus(&self) -> Option<&CharacterInGame> {
        self.focus_index().map(|i| &self.state.characters_in_game[i])
    }

    pub fn hint(&self) -> Option<String> {
        self.focus()
            .map(|c| pinyin::hint(&c.character.pinyin, c.attempt_count))
    }

    fn focus_index(&self) -> Option<usize> {
        closest_to_base(self.state.characters_in_game.iter().enumerate())
    }

    /// Advance the session by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.state.is_paused {
            return;
        }
        self.expire_feedback(dt_ms);
        match self.phase {
            GamePhase::Active => {
                self.advance_fall(dt_ms);
                self.check_complete();
                if self.phase == GamePhase::Active {
                    self.advance_spawn(dt_ms);
                }
            }
            GamePhase::Complete | GamePhase::GameOver => self.advance_exit(dt_ms),
        }
    }

    fn expire_feedback(&mut self, dt_ms: f64) {
        if let Some(fb) = self.feedback.as_mut() {
            fb.remaining_ms -= dt_ms;
            if fb.remaining_ms <= 0.0 {
                self.feedback = None;
            }
        }
    }

    fn show_feedback(&mut self, message: &str, emoji: &'static str, kind: FeedbackKind) {
        self.feedback = Some(Feedback {
            message: message.to_string(),
            emoji,
            kind,
            remaining_ms: self.config.feedback_ms,
        });
    }

    fn advance_fall(&mut self, dt_ms: f64) {
        let base_x = self.config.base_x;
        let mut reached = Vec::new();
        for c in self.state.characters_in_game.iter_mut() {
            let step_ms = self.config.fall_step_ms(c.speed).max(1.0);
            c.fall_elapsed_ms += dt_ms;
            while c.fall_elapsed_ms >= step_ms {
                c.fall_elapsed_ms -= step_ms;
                let next = c.x_position - 1.0;
                if next <= base_x {
                    reached.push(c.unique_id.clone());
                    break;
                }
                c.x_position = next;
            }
        }
        for unique_id in reached {
            if self.phase != GamePhase::Active {
                break;
            }
            self.reach_base(&unique_id);
        }
    }

    fn reach_base(&mut self, unique_id: &str) {
        let chars = &mut self.state.characters_in_game;
        let Some(idx) = chars.iter().position(|c| c.unique_id == unique_id) else {
            return;
        };
        chars.remove(idx);
        self.lives = self.lives.saturating_sub(1);
        self.spawn_timer_ms = 0.0;
        debug!("{} reached the base, {} lives left", unique_id, self.lives);
        self.events.push(GameEvent::Missed {
            unique_id: unique_id.to_string(),
            lives_left: self.lives,
        });
        if self.lives == 0 {
            info!("game over on level {}", self.level.level);
            self.phase = GamePhase::GameOver;
            self.state.is_game_active = false;
            self.exit_timer_ms = Some(self.config.game_over_delay_ms);
            self.show_feedback("Game Over!", "💪", FeedbackKind::Error);
            self.events.push(GameEvent::GameOver);
        }
    }

    fn all_spawned(&self) -> bool {
        self.state.current_character_index >= self.working.len()
    }

    fn check_complete(&mut self) {
        if self.phase != GamePhase::Active
            || !self.all_spawned()
            || !self.state.characters_in_game.is_empty()
        {
            return;
        }
        let accuracy = self.accuracy();
        info!(
            "level {} complete: score {}, accuracy {:.1}%",
            self.level.level, self.state.score, accuracy
        );
        self.phase = GamePhase::Complete;
        self.state.is_game_active = false;
        self.exit_timer_ms = Some(self.config.results_delay_ms);
        self.events.push(GameEvent::LevelComplete {
            score: self.state.score,
            accuracy,
        });
    }

    fn should_spawn(&self) -> bool {
        self.state.characters_in_game.len() < self.level.simultaneous_characters
            && !self.all_spawned()
    }

    fn advance_spawn(&mut self, dt_ms: f64) {
        if !self.should_spawn() {
            self.spawn_timer_ms = 0.0;
            return;
        }
        self.spawn_timer_ms += dt_ms;
        if self.spawn_timer_ms >= self.config.spawn_interval_ms {
            self.spawn_timer_ms = 0.0;
            self.spawn_next();
        }
    }

    fn spawn_next(&mut self) {
        let Some(character) = self.working.get(self.state.current_character_index).cloned() else {
            return;
        };
        let serial = self.next_serial;
        self.next_serial += 1;
        let unique_id = format!("{}-{}", character.id, serial);
        let y_position =
            self.config.lane_min_y + self.rng.gen_range(0.0_f64..1.0) * self.config.lane_span_y;
        debug!("spawn {} ({}) at lane {:.1}", character.character, unique_id, y_position);
        self.state.characters_in_game.push(CharacterInGame {
            character,
            x_position: self.config.spawn_x,
            y_position,
            speed: self.level.speed,
            attempt_count: 0,
            is_active: true,
            unique_id: unique_id.clone(),
            serial,
            fall_elapsed_ms: 0.0,
        });
        self.state.current_character_index += 1;
        self.events.push(GameEvent::Spawned { unique_id });
    }

    fn advance_exit(&mut self, dt_ms: f64) {
        let Some(remaining) = self.exit_timer_ms.as_mut() else {
            return;
        };
        *remaining -= dt_ms;
        if *remaining > 0.0 {
            return;
        }
        self.exit_timer_ms = None;
        let event = match self.phase {
            GamePhase::GameOver => GameEvent::ExitToLevelSelect,
            _ => GameEvent::ShowResults,
        };
        self.events.push(event);
    }

    /// Match `input` against the characters on screen.
    ///
    /// When several characters accept the input (homophones), the one closest to the
    /// base wins. A miss counts against the focus character only.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let input = input.trim();
        if self.phase != GamePhase::Active
            || self.state.is_paused
            || input.is_empty()
            || self.state.characters_in_game.is_empty()
        {
            return SubmitOutcome::Ignored;
        }
        self.state.attempt_count += 1;

        let matching = self
            .state
            .characters_in_game
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active && pinyin::validate(input, &c.character.pinyin));
        if let Some(idx) = closest_to_base(matching) {
            let solved = self.state.characters_in_game.remove(idx);
            let reward = calculate_score(solved.attempt_count + 1);
            self.state.score += reward.points;
            self.state.correct_count += 1;
            self.spawn_timer_ms = 0.0;
            debug!(
                "{} matched on try {} for {} points",
                solved.unique_id,
                solved.attempt_count + 1,
                reward.points
            );
            self.show_feedback(reward.message, reward.emoji, FeedbackKind::Success);
            self.events.push(GameEvent::Matched {
                unique_id: solved.unique_id,
                reward,
            });
            self.check_complete();
            return SubmitOutcome::Correct(reward);
        }

        let Some(idx) = self.focus_index() else {
            return SubmitOutcome::Wrong;
        };
        let target = &mut self.state.characters_in_game[idx];
        let prior = target.attempt_count;
        target.attempt_count += 1;
        let (unique_id, attempt_count) = (target.unique_id.clone(), target.attempt_count);
        let missed = target.character.clone();
        if !self.struggled.iter().any(|c| c.id == missed.id) {
            self.struggled.push(missed);
        }
        let message = if prior >= 2 { "Try again!" } else { "Oops!" };
        self.show_feedback(message, "🤔", FeedbackKind::Error);
        self.events.push(GameEvent::WrongAnswer {
            unique_id,
            attempt_count,
        });
        SubmitOutcome::Wrong
    }
}

/// Index of the candidate with the smallest x (closest to the base); spawn order
/// breaks ties.
fn closest_to_base<'a>(
    candidates: impl Iterator<Item = (usize, &'a CharacterInGame)>,
) -> Option<usize> {
    candidates
        .min_by(|(_, a), (_, b)| {
            a.x_position
                .total_cmp(&b.x_position)
                .then(a.serial.cmp(&b.serial))
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn session(level: u32) -> Session {
        Session::new(level, GameConfig::default(), StdRng::seed_from_u64(11)).unwrap()
    }

    fn run(s: &mut Session, ms: f64) {
        let mut left = ms;
        while left > 0.0 {
            let dt = left.min(100.0);
            s.tick(dt);
            left -= dt;
        }
    }

    #[test]
    fn initialize_resets_counters() {
        let s = session(2);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.score(), 0);
        assert_eq!(s.state().total_characters, 25);
        assert_eq!(s.working_list().len(), 25);
        assert!(s.characters().is_empty());
        assert_eq!(s.phase(), GamePhase::Active);
        assert!(s.state().is_game_active);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = Session::new(9, GameConfig::default(), StdRng::seed_from_u64(1)).err();
        assert_eq!(err, Some(GameError::UnknownLevel(9)));
    }

    #[test]
    fn spawn_waits_for_interval_and_cap() {
        let mut s = session(1);
        run(&mut s, 1900.0);
        assert!(s.characters().is_empty());
        run(&mut s, 100.0);
        assert_eq!(s.characters().len(), 1);
        let c = &s.characters()[0];
        assert_eq!(c.x_position, 110.0);
        assert!(c.y_position >= 10.0 && c.y_position < 60.0);
        assert_eq!(s.state().current_character_index, 1);
        // level 1 allows one character at a time
        run(&mut s, 4000.0);
        assert_eq!(s.characters().len(), 1);
        assert_eq!(s.state().current_character_index, 1);
    }

    #[test]
    fn characters_fall_one_unit_per_step() {
        let mut s = session(1);
        run(&mut s, 2000.0);
        // level 1: speed 10 -> one step every 100 ms
        run(&mut s, 1000.0);
        assert_eq!(s.characters()[0].x_position, 100.0);
    }

    #[test]
    fn unique_ids_differ_for_same_glyph() {
        let pool = vec![Character::new(7, "七", "qī"); 4];
        let slow = GameConfig {
            fall_step_scale: 1000.0,
            ..GameConfig::default()
        };
        let mut s = Session::from_pool(4, &pool, slow, StdRng::seed_from_u64(2)).unwrap();
        run(&mut s, 6000.0);
        let ids: Vec<_> = s.characters().iter().map(|c| c.unique_id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn submit_without_characters_is_noop() {
        let mut s = session(1);
        assert_eq!(s.submit("ni"), SubmitOutcome::Ignored);
        assert_eq!(s.state().attempt_count, 0);
    }

    #[test]
    fn homophones_resolve_to_closest_to_base() {
        let pool = vec![Character::new(51, "他", "tā"), Character::new(52, "她", "tā")];
        let mut s =
            Session::from_pool(3, &pool, GameConfig::default(), StdRng::seed_from_u64(5)).unwrap();
        run(&mut s, 2000.0);
        let first = s.characters()[0].unique_id.clone();
        run(&mut s, 2000.0);
        assert_eq!(s.characters().len(), 2);
        assert!(s.characters()[0].x_position < s.characters()[1].x_position);
        assert!(matches!(s.submit("ta"), SubmitOutcome::Correct(_)));
        assert!(s.characters().iter().all(|c| c.unique_id != first));
    }

    #[test]
    fn wrong_answer_escalates_message_and_hint() {
        let mut s = session(1);
        run(&mut s, 2000.0);
        assert_eq!(s.submit("xxx"), SubmitOutcome::Wrong);
        assert_eq!(s.feedback().map(|f| f.message.as_str()), Some("Oops!"));
        s.submit("xxx");
        s.submit("xxx");
        assert_eq!(s.feedback().map(|f| f.message.as_str()), Some("Try again!"));
        assert!(s.hint().unwrap().starts_with("Answer: "));
        assert_eq!(s.struggled_characters().len(), 1);
        let pinyin = s.characters()[0].character.pinyin.clone();
        assert_eq!(s.submit(&pinyin), SubmitOutcome::Correct(calculate_score(4)));
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn feedback_expires() {
        let mut s = session(1);
        run(&mut s, 2000.0);
        s.submit("xxx");
        assert!(s.feedback().is_some());
        run(&mut s, 1000.0);
        assert!(s.feedback().is_none());
    }

    #[test]
    fn pause_freezes_time_and_input() {
        let mut s = session(1);
        run(&mut s, 2000.0);
        s.pause();
        run(&mut s, 5000.0);
        assert_eq!(s.characters()[0].x_position, 110.0);
        assert_eq!(s.submit("xxx"), SubmitOutcome::Ignored);
        s.resume();
        run(&mut s, 100.0);
        assert_eq!(s.characters()[0].x_position, 109.0);
    }

    #[test]
    fn feedback_waits_out_a_pause() {
        let mut s = session(1);
        run(&mut s, 2000.0);
        assert_eq!(s.submit("qqq"), SubmitOutcome::Wrong);
        s.pause();
        for _ in 0..20 {
            s.tick(100.0);
        }
        assert!(s.feedback().is_some(), "feedback expired while paused");
        s.resume();
        s.tick(1000.0);
        assert!(s.feedback().is_none());
    }
}
