//! Level catalog. Levels are numbered from 1 and played in order; a level is locked
//! while its number is above the unlocked watermark.

use crate::store::Language;

/// Level descriptor (immutable).
#[derive(Debug)]
pub struct LevelConfig {
    pub level: u32,
    pub name: &'static str,
    pub localized_name: &'static str,
    pub character_count: usize,
    /// Seconds for one traversal of the play field.
    pub speed: f64,
    pub simultaneous_characters: usize,
    pub description: &'static str,
    pub sticker: &'static str,
}

impl LevelConfig {
    pub fn title(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name,
            Language::ZhTw => self.localized_name,
        }
    }

    pub fn is_locked(&self, unlocked_levels: u32) -> bool {
        self.level > unlocked_levels
    }
}

pub static LEVELS: [LevelConfig; 4] = [
    LevelConfig {
        level: 1,
        name: "New Joiner",
        localized_name: "新手训练",
        character_count: 10,
        speed: 10.0,
        simultaneous_characters: 1,
        description: "Tutorial level - Learn the basics!",
        sticker: "🐉",
    },
    LevelConfig {
        level: 2,
        name: "Little Hero",
        localized_name: "小勇士",
        character_count: 25,
        speed: 7.0,
        simultaneous_characters: 1,
        description: "You're getting stronger!",
        sticker: "🚀",
    },
    LevelConfig {
        level: 3,
        name: "Big Hero",
        localized_name: "大英雄",
        character_count: 50,
        speed: 5.0,
        simultaneous_characters: 2,
        description: "Amazing progress!",
        sticker: "🏆",
    },
    LevelConfig {
        level: 4,
        name: "Super Champion",
        localized_name: "超级冠军",
        character_count: 100,
        speed: 3.0,
        simultaneous_characters: 3,
        description: "Ultimate challenge!",
        sticker: "👑",
    },
];

/// Look up a level by its 1-based number.
pub fn level(number: u32) -> Option<&'static LevelConfig> {
    let idx = (number as usize).checked_sub(1)?;
    LEVELS.get(idx)
}

pub fn last_level() -> u32 {
    LEVELS.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_contiguous_from_one() {
        for (i, cfg) in LEVELS.iter().enumerate() {
            assert_eq!(cfg.level as usize, i + 1);
        }
        assert_eq!(last_level(), 4);
    }

    #[test]
    fn lookup_rejects_out_of_range() {
        assert!(level(0).is_none());
        assert!(level(5).is_none());
        assert_eq!(level(3).map(|l| l.simultaneous_characters), Some(2));
    }

    #[test]
    fn lock_follows_watermark() {
        assert!(!LEVELS[0].is_locked(1));
        assert!(LEVELS[1].is_locked(1));
        assert!(!LEVELS[1].is_locked(2));
    }

    #[test]
    fn title_follows_language() {
        assert_eq!(LEVELS[2].title(Language::En), "Big Hero");
        assert_eq!(LEVELS[2].title(Language::ZhTw), "大英雄");
    }
}
