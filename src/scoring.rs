//! Reward and rating tables.

/// Points and celebration for one solved character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreReward {
    pub points: u32,
    pub message: &'static str,
    pub emoji: &'static str,
}

/// Reward for solving a character on try number `attempt` (1 = first try).
pub fn calculate_score(attempt: u32) -> ScoreReward {
    match attempt {
        0 | 1 => ScoreReward { points: 10, message: "GREAT JOB!", emoji: "🎉" },
        2 => ScoreReward { points: 7, message: "NICE!", emoji: "😊" },
        3 => ScoreReward { points: 5, message: "GOOD TRY!", emoji: "👍" },
        _ => ScoreReward { points: 1, message: "Keep going!", emoji: "💪" },
    }
}

/// Star rating (1..=5) for an accuracy percentage. Every finished level earns a star.
pub fn calculate_stars(accuracy: f64) -> u8 {
    if accuracy >= 90.0 {
        5
    } else if accuracy >= 75.0 {
        4
    } else if accuracy >= 60.0 {
        3
    } else if accuracy >= 40.0 {
        2
    } else {
        1
    }
}

/// Percentage of `correct` over `attempted`; 0 when nothing was attempted.
pub fn calculate_level_accuracy(correct: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    correct as f64 / attempted as f64 * 100.0
}
