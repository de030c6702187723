use thiserror::Error;

/// Navigation failures surfaced to the front end as a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level {level} is locked (unlocked up to {unlocked})")]
    LevelLocked { level: u32, unlocked: u32 },
    #[error("no incorrect words to review")]
    NoIncorrectWords,
}
