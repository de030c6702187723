//! No-pressure drills: free practice over the whole pool, and review of the words
//! the learner got wrong in the main game. Nothing falls and no lives are at stake;
//! a wrong answer simply keeps the current character.

use log::info;
use rand::rngs::StdRng;

use crate::dataset::Character;
use crate::error::GameError;
use crate::pinyin;
use crate::scoring::calculate_level_accuracy;
use crate::shuffle::shuffle_array;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillOutcome {
    Ignored,
    /// `cycle_finished` is set when this answer used up the queue.
    Correct { cycle_finished: bool },
    Wrong,
}

/// Endless practice over a shuffled copy of the pool; reshuffled when used up.
pub struct PracticeSession {
    pool: Vec<Character>,
    queue: Vec<Character>,
    index: usize,
    progress: u32,
    show_answer: bool,
    rng: StdRng,
}

impl PracticeSession {
    pub fn new(pool: &[Character], mut rng: StdRng) -> Self {
        let queue = shuffle_array(pool, &mut rng);
        Self {
            pool: pool.to_vec(),
            queue,
            index: 0,
            progress: 0,
            show_answer: false,
            rng,
        }
    }

    pub fn current(&self) -> Option<&Character> {
        self.queue.get(self.index)
    }

    /// Characters answered correctly so far.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn answer_shown(&self) -> bool {
        self.show_answer
    }

    /// Reveal the pinyin of the current character.
    pub fn reveal_answer(&mut self) -> Option<&str> {
        self.show_answer = true;
        self.current().map(|c| c.pinyin.as_str())
    }

    pub fn submit(&mut self, input: &str) -> DrillOutcome {
        let Some(current) = self.current() else {
            return DrillOutcome::Ignored;
        };
        if input.trim().is_empty() {
            return DrillOutcome::Ignored;
        }
        if !pinyin::validate(input, &current.pinyin) {
            return DrillOutcome::Wrong;
        }
        self.show_answer = false;
        self.progress += 1;
        self.index += 1;
        let cycle_finished = self.index >= self.queue.len();
        if cycle_finished {
            info!("practice cycle done after {} answers, reshuffling", self.progress);
            self.queue = shuffle_array(&self.pool, &mut self.rng);
            self.index = 0;
        }
        DrillOutcome::Correct { cycle_finished }
    }
}

/// One pass over the stored incorrect words.
pub struct ReviewSession {
    words: Vec<Character>,
    index: usize,
    correct: u32,
    attempted: u32,
    show_answer: bool,
}

impl ReviewSession {
    pub fn new(words: Vec<Character>) -> Result<Self, GameError> {
        if words.is_empty() {
            return Err(GameError::NoIncorrectWords);
        }
        Ok(Self {
            words,
            index: 0,
            correct: 0,
            attempted: 0,
            show_answer: false,
        })
    }

    pub fn current(&self) -> Option<&Character> {
        self.words.get(self.index)
    }

    /// 1-based position of the current word and the queue length.
    pub fn position(&self) -> (usize, usize) {
        ((self.index + 1).min(self.words.len()), self.words.len())
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.words.len()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn accuracy(&self) -> f64 {
        calculate_level_accuracy(self.correct, self.attempted)
    }

    pub fn answer_shown(&self) -> bool {
        self.show_answer
    }

    pub fn reveal_answer(&mut self) -> Option<&str> {
        self.show_answer = true;
        self.current().map(|c| c.pinyin.as_str())
    }

    pub fn submit(&mut self, input: &str) -> DrillOutcome {
        let Some(current) = self.current() else {
            return DrillOutcome::Ignored;
        };
        if input.trim().is_empty() {
            return DrillOutcome::Ignored;
        }
        let matched = pinyin::validate(input, &current.pinyin);
        self.attempted += 1;
        if !matched {
            return DrillOutcome::Wrong;
        }
        self.correct += 1;
        self.show_answer = false;
        self.index += 1;
        DrillOutcome::Correct {
            cycle_finished: self.is_finished(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn words() -> Vec<Character> {
        vec![
            Character::new(1, "一", "yī"),
            Character::new(2, "二", "èr"),
            Character::new(3, "三", "sān"),
        ]
    }

    #[test]
    fn practice_keeps_character_on_wrong_answer() {
        let mut p = PracticeSession::new(&words(), StdRng::seed_from_u64(4));
        let first = p.current().cloned().unwrap();
        assert_eq!(p.submit("zzz"), DrillOutcome::Wrong);
        assert_eq!(p.current(), Some(&first));
        assert_eq!(p.progress(), 0);
    }

    #[test]
    fn practice_reshuffles_when_depleted() {
        let mut p = PracticeSession::new(&words(), StdRng::seed_from_u64(4));
        for round in 0..3 {
            let answer = p.current().unwrap().pinyin.clone();
            let outcome = p.submit(&answer);
            assert_eq!(outcome, DrillOutcome::Correct { cycle_finished: round == 2 });
        }
        assert_eq!(p.progress(), 3);
        assert!(p.current().is_some());
    }

    #[test]
    fn reveal_resets_after_correct_answer() {
        let mut p = PracticeSession::new(&words(), StdRng::seed_from_u64(8));
        let answer = p.reveal_answer().map(str::to_string).unwrap();
        assert!(p.answer_shown());
        p.submit(&answer);
        assert!(!p.answer_shown());
    }

    #[test]
    fn review_requires_words() {
        assert_eq!(ReviewSession::new(Vec::new()).err(), Some(GameError::NoIncorrectWords));
    }

    #[test]
    fn review_tracks_accuracy_and_finishes() {
        let mut r = ReviewSession::new(words()).unwrap();
        assert_eq!(r.accuracy(), 0.0);
        assert_eq!(r.submit("er"), DrillOutcome::Wrong);
        assert_eq!(r.submit("YI"), DrillOutcome::Correct { cycle_finished: false });
        assert_eq!(r.position(), (2, 3));
        r.submit("er");
        assert_eq!(r.submit("san"), DrillOutcome::Correct { cycle_finished: true });
        assert!(r.is_finished());
        assert_eq!(r.accuracy(), 75.0);
        assert_eq!(r.submit("san"), DrillOutcome::Ignored);
    }
}
