// Dataset and level catalog invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use pinyin_air_force::pinyin::{normalize, validate};
use pinyin_air_force::{LEVELS, character_pool};

#[test]
fn characters_are_unique_with_sequential_ids() {
    let mut seen = HashSet::new();
    for (i, c) in character_pool().iter().enumerate() {
        assert!(seen.insert(c.character.as_str()), "duplicate hanzi '{}'", c.character);
        assert_eq!(c.id as usize, i + 1, "id gap at '{}'", c.character);
        assert_eq!(c.character.chars().count(), 1, "'{}' is not a single hanzi", c.character);
    }
}

#[test]
fn pinyin_folds_to_plain_lowercase() {
    for c in character_pool() {
        assert!(!c.pinyin.is_empty(), "empty pinyin for '{}'", c.character);
        let folded = normalize(&c.pinyin);
        for ch in folded.chars() {
            assert!(ch.is_ascii_lowercase(), "invalid char '{}' in folded pinyin '{}' for '{}'", ch, folded, c.character);
        }
        assert!(validate(&folded, &c.pinyin), "'{}' does not accept its own folded pinyin", c.character);
        assert!(validate(&c.pinyin, &c.pinyin));
    }
}

#[test]
fn pool_covers_the_largest_level() {
    let largest = LEVELS.iter().map(|l| l.character_count).max().unwrap();
    assert!(character_pool().len() >= largest);
}

#[test]
fn levels_get_harder() {
    for pair in LEVELS.windows(2) {
        assert!(pair[1].character_count > pair[0].character_count);
        assert!(pair[1].speed < pair[0].speed);
        assert!(pair[1].simultaneous_characters >= pair[0].simultaneous_characters);
    }
}
