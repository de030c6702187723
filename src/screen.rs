//! Screen controller.
//!
//! [`App`] switches between the menu, level select, the falling-character game, the
//! results screen, the two drills and the performance board. It owns the only
//! [`ProgressStore`] and is the single place where best stars, the unlock watermark,
//! game records and incorrect words are written.

use chrono::Utc;
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::{GameConfig, Params};
use crate::dataset::character_pool;
use crate::error::GameError;
use crate::game::{GameEvent, Session, SubmitOutcome};
use crate::levels::{self, LevelConfig};
use crate::practice::{DrillOutcome, PracticeSession, ReviewSession};
use crate::scoring::calculate_stars;
use crate::store::{GameRecord, Language, ProgressStore, Storage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    LevelSelect,
    Game,
    Results,
    Practice,
    Review,
    Performance,
}

/// Outcome of a finished level, shown on the results screen.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelResult {
    pub level: u32,
    pub score: u32,
    pub accuracy: f64,
    pub stars: u8,
    pub best_stars: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Game(SubmitOutcome),
    Drill(DrillOutcome),
}

/// A message shown over whatever screen is current until it times out.
#[derive(Clone, Debug)]
struct Notice {
    message: String,
    remaining_ms: f64,
}

pub struct App<S: Storage> {
    store: ProgressStore<S>,
    config: GameConfig,
    rng: StdRng,
    screen: Screen,
    session: Option<Session>,
    result: Option<LevelResult>,
    practice: Option<PracticeSession>,
    review: Option<ReviewSession>,
    notice: Option<Notice>,
}

impl<S: Storage> App<S> {
    pub fn new(storage: S, config: GameConfig, rng: StdRng) -> Self {
        Self {
            store: ProgressStore::new(storage),
            config,
            rng,
            screen: Screen::Menu,
            session: None,
            result: None,
            practice: None,
            review: None,
            notice: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn result(&self) -> Option<&LevelResult> {
        self.result.as_ref()
    }

    pub fn practice(&self) -> Option<&PracticeSession> {
        self.practice.as_ref()
    }

    pub fn review(&self) -> Option<&ReviewSession> {
        self.review.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.message.as_str())
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take().map(|n| n.message)
    }

    fn set_notice(&mut self, message: &str) {
        self.notice = Some(Notice {
            message: message.to_string(),
            remaining_ms: self.config.notice_ms,
        });
    }

    fn expire_notice(&mut self, dt_ms: f64) {
        if let Some(notice) = self.notice.as_mut() {
            notice.remaining_ms -= dt_ms;
            if notice.remaining_ms <= 0.0 {
                self.notice = None;
            }
        }
    }

    pub fn language(&self) -> Language {
        self.store.language()
    }

    pub fn set_language(&mut self, language: Language) {
        self.store.set_language(language);
    }

    /// Levels with their lock state and best stars, for the level select screen.
    pub fn level_overview(&self) -> Vec<(&'static LevelConfig, bool, u8)> {
        let unlocked = self.store.unlocked_levels();
        let stars = self.store.level_stars();
        levels::LEVELS
            .iter()
            .map(|l| (l, l.is_locked(unlocked), stars.get(&l.level).copied().unwrap_or(0)))
            .collect()
    }

    fn go(&mut self, screen: Screen) {
        if self.screen != screen {
            info!("screen {:?} -> {:?}", self.screen, screen);
        }
        self.screen = screen;
    }

    fn child_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.next_u64())
    }

    pub fn open_menu(&mut self) {
        self.session = None;
        self.practice = None;
        self.review = None;
        self.go(Screen::Menu);
    }

    pub fn open_level_select(&mut self) {
        self.session = None;
        self.go(Screen::LevelSelect);
    }

    /// Leave a level mid-play. Characters guessed wrong so far still go to review.
    pub fn abandon_level(&mut self) {
        if let Some(session) = self.session.as_ref() {
            info!("level {} abandoned", session.level().level);
        }
        self.remember_struggled();
        self.open_level_select();
    }

    /// Begin an attempt at `level`. Locked or unknown levels are refused.
    pub fn start_level(&mut self, level: u32) -> Result<(), GameError> {
        let cfg = levels::level(level).ok_or(GameError::UnknownLevel(level))?;
        let unlocked = self.store.unlocked_levels();
        if cfg.is_locked(unlocked) {
            return Err(GameError::LevelLocked { level, unlocked });
        }
        let rng = self.child_rng();
        self.session = Some(Session::new(level, self.config.clone(), rng)?);
        self.result = None;
        self.go(Screen::Game);
        Ok(())
    }

    /// Advance the active screen by `dt_ms` and apply the session's transitions.
    /// Returns the gameplay events of this tick for the front end.
    pub fn tick(&mut self, dt_ms: f64) -> Vec<GameEvent> {
        self.expire_notice(dt_ms);
        if self.screen != Screen::Game {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.tick(dt_ms);
        let events = session.drain_events();
        for event in &events {
            match event {
                GameEvent::ExitToLevelSelect => self.leave_after_game_over(),
                GameEvent::ShowResults => self.show_results(),
                _ => {}
            }
        }
        events
    }

    fn remember_struggled(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.store.add_incorrect_words(session.struggled_characters());
        }
    }

    fn leave_after_game_over(&mut self) {
        self.remember_struggled();
        self.set_notice("Game Over! Don't worry, try again! 💪");
        self.open_level_select();
    }

    fn show_results(&mut self) {
        self.remember_struggled();
        let Some(session) = self.session.take() else {
            return;
        };
        let level = session.level().level;
        let accuracy = session.accuracy();
        let stars = calculate_stars(accuracy);
        let best_stars = self.store.record_stars(level, stars);
        if level < levels::last_level() {
            self.store.unlock(level + 1);
        }
        self.result = Some(LevelResult {
            level,
            score: session.score(),
            accuracy,
            stars,
            best_stars,
        });
        self.go(Screen::Results);
    }

    /// Append the pending result to the record list, once.
    fn archive_result(&mut self) -> Option<u32> {
        let result = self.result.take()?;
        self.store.push_record(GameRecord {
            level: result.level,
            score: result.score,
            accuracy: result.accuracy,
            stars: result.stars,
            date: Utc::now(),
        });
        Some(result.level)
    }

    /// Results screen: play the next level, or return to level select after the last.
    pub fn continue_next(&mut self) -> Result<(), GameError> {
        let Some(level) = self.archive_result() else {
            return Ok(());
        };
        if level < levels::last_level() {
            self.start_level(level + 1)
        } else {
            self.open_level_select();
            Ok(())
        }
    }

    pub fn replay(&mut self) -> Result<(), GameError> {
        match self.archive_result() {
            Some(level) => self.start_level(level),
            None => Ok(()),
        }
    }

    pub fn results_to_menu(&mut self) {
        self.archive_result();
        self.open_menu();
    }

    pub fn open_practice(&mut self) {
        let rng = self.child_rng();
        self.practice = Some(PracticeSession::new(character_pool(), rng));
        self.go(Screen::Practice);
    }

    /// Review the stored incorrect words. With none stored, stay on the menu with a
    /// notice.
    pub fn open_review(&mut self) -> Result<(), GameError> {
        match ReviewSession::new(self.store.incorrect_words()) {
            Ok(review) => {
                self.review = Some(review);
                self.go(Screen::Review);
                Ok(())
            }
            Err(err) => {
                self.set_notice("No incorrect words to practice yet!");
                self.open_menu();
                Err(err)
            }
        }
    }

    pub fn open_performance(&mut self) {
        self.go(Screen::Performance);
    }

    pub fn top_records(&self) -> Vec<GameRecord> {
        self.store.top_records(Params::TOP_RECORDS)
    }

    pub fn clear_records(&mut self) {
        self.store.clear_records();
    }

    /// Route typed input to whatever the current screen is asking for.
    pub fn submit(&mut self, input: &str) -> InputOutcome {
        match self.screen {
            Screen::Game => match self.session.as_mut() {
                Some(session) => InputOutcome::Game(session.submit(input)),
                None => InputOutcome::Ignored,
            },
            Screen::Practice => match self.practice.as_mut() {
                Some(practice) => InputOutcome::Drill(practice.submit(input)),
                None => InputOutcome::Ignored,
            },
            Screen::Review => {
                let Some(review) = self.review.as_mut() else {
                    return InputOutcome::Ignored;
                };
                let outcome = review.submit(input);
                if review.is_finished() {
                    self.store.clear_incorrect_words();
                    self.set_notice("All incorrect words cleared! 🎉");
                    self.open_menu();
                }
                InputOutcome::Drill(outcome)
            }
            _ => InputOutcome::Ignored,
        }
    }

    /// Show the answer in the drills.
    pub fn reveal_answer(&mut self) -> Option<String> {
        match self.screen {
            Screen::Practice => self.practice.as_mut()?.reveal_answer().map(str::to_string),
            Screen::Review => self.review.as_mut()?.reveal_answer().map(str::to_string),
            _ => None,
        }
    }
}
