//! Per-device persistence.
//!
//! Everything goes through the [`Storage`] port as JSON strings under fixed keys.
//! A missing or unreadable value is treated as absent and replaced by its default;
//! nothing here can fail the caller.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dataset::Character;

pub const KEY_LANGUAGE: &str = "language";
pub const KEY_UNLOCKED_LEVELS: &str = "unlockedLevels";
pub const KEY_LEVEL_STARS: &str = "levelStars";
pub const KEY_GAME_RECORDS: &str = "gameRecords";
pub const KEY_INCORRECT_WORDS: &str = "incorrectWords";

/// Key/value persistence port.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process storage, used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.inner.set_item(key, value).is_err() {
            warn!("localStorage write failed for {}", key);
        }
    }

    fn remove(&mut self, key: &str) {
        if self.inner.remove_item(key).is_err() {
            warn!("localStorage remove failed for {}", key);
        }
    }
}

/// UI language preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

/// One finished level attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub level: u32,
    pub score: u32,
    pub accuracy: f64,
    pub stars: u8,
    pub date: DateTime<Utc>,
}

/// Typed view over a [`Storage`].
pub struct ProgressStore<S: Storage> {
    storage: S,
}

impl<S: Storage> ProgressStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("ignoring malformed {} ({}): {}", key, err, raw);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.storage.set(key, &json),
            Err(err) => warn!("could not encode {}: {}", key, err),
        }
    }

    pub fn language(&self) -> Language {
        self.read(KEY_LANGUAGE).unwrap_or_default()
    }

    pub fn set_language(&mut self, language: Language) {
        self.write(KEY_LANGUAGE, &language);
    }

    /// Highest playable level; never below 1.
    pub fn unlocked_levels(&self) -> u32 {
        self.read::<u32>(KEY_UNLOCKED_LEVELS).unwrap_or(1).max(1)
    }

    /// Raise the watermark to `level`. Lower values are ignored.
    pub fn unlock(&mut self, level: u32) -> u32 {
        let current = self.unlocked_levels();
        if level > current {
            self.write(KEY_UNLOCKED_LEVELS, &level);
            level
        } else {
            current
        }
    }

    pub fn level_stars(&self) -> BTreeMap<u32, u8> {
        self.read(KEY_LEVEL_STARS).unwrap_or_default()
    }

    /// Keep the best star count for `level`; returns the stored best.
    pub fn record_stars(&mut self, level: u32, stars: u8) -> u8 {
        let mut all = self.level_stars();
        let best = all.get(&level).copied().unwrap_or(0).max(stars);
        all.insert(level, best);
        self.write(KEY_LEVEL_STARS, &all);
        best
    }

    pub fn game_records(&self) -> Vec<GameRecord> {
        self.read(KEY_GAME_RECORDS).unwrap_or_default()
    }

    pub fn push_record(&mut self, record: GameRecord) {
        let mut records = self.game_records();
        records.push(record);
        self.write(KEY_GAME_RECORDS, &records);
    }

    /// Best `n` records by score, highest first.
    pub fn top_records(&self, n: usize) -> Vec<GameRecord> {
        let mut records = self.game_records();
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(n);
        records
    }

    pub fn clear_records(&mut self) {
        self.storage.remove(KEY_GAME_RECORDS);
    }

    pub fn incorrect_words(&self) -> Vec<Character> {
        self.read(KEY_INCORRECT_WORDS).unwrap_or_default()
    }

    /// Merge `words` into the incorrect-word set (deduplicated by id).
    pub fn add_incorrect_words<'a>(&mut self, words: impl IntoIterator<Item = &'a Character>) {
        let mut all = self.incorrect_words();
        let before = all.len();
        for word in words {
            if !all.iter().any(|w| w.id == word.id) {
                all.push(word.clone());
            }
        }
        if all.len() != before {
            self.write(KEY_INCORRECT_WORDS, &all);
        }
    }

    pub fn clear_incorrect_words(&mut self) {
        self.storage.remove(KEY_INCORRECT_WORDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ProgressStore<MemoryStorage> {
        ProgressStore::new(MemoryStorage::new())
    }

    #[test]
    fn defaults_when_empty() {
        let s = store();
        assert_eq!(s.language(), Language::En);
        assert_eq!(s.unlocked_levels(), 1);
        assert!(s.level_stars().is_empty());
        assert!(s.game_records().is_empty());
        assert!(s.incorrect_words().is_empty());
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let mut mem = MemoryStorage::new();
        mem.set(KEY_UNLOCKED_LEVELS, "three");
        mem.set(KEY_LEVEL_STARS, "{not json");
        mem.set(KEY_GAME_RECORDS, "42");
        mem.set(KEY_LANGUAGE, "\"klingon\"");
        let s = ProgressStore::new(mem);
        assert_eq!(s.unlocked_levels(), 1);
        assert!(s.level_stars().is_empty());
        assert!(s.game_records().is_empty());
        assert_eq!(s.language(), Language::En);
    }

    #[test]
    fn unlock_watermark_never_decreases() {
        let mut s = store();
        assert_eq!(s.unlock(3), 3);
        assert_eq!(s.unlock(2), 3);
        assert_eq!(s.unlocked_levels(), 3);
        assert_eq!(s.storage().get(KEY_UNLOCKED_LEVELS).as_deref(), Some("3"));
    }

    #[test]
    fn best_stars_are_kept() {
        let mut s = store();
        assert_eq!(s.record_stars(1, 3), 3);
        assert_eq!(s.record_stars(1, 2), 3);
        assert_eq!(s.record_stars(1, 5), 5);
        assert_eq!(s.level_stars().get(&1), Some(&5));
    }

    #[test]
    fn language_uses_short_codes() {
        let mut s = store();
        s.set_language(Language::ZhTw);
        assert_eq!(s.storage().get(KEY_LANGUAGE).as_deref(), Some("\"zh-TW\""));
        assert_eq!(s.language(), Language::ZhTw);
    }

    #[test]
    fn top_records_sorted_by_score() {
        let mut s = store();
        for (level, score) in [(1, 40), (2, 90), (1, 70)] {
            s.push_record(GameRecord {
                level,
                score,
                accuracy: 50.0,
                stars: 2,
                date: Utc::now(),
            });
        }
        let top = s.top_records(2);
        assert_eq!(top.iter().map(|r| r.score).collect::<Vec<_>>(), vec![90, 70]);
        s.clear_records();
        assert!(s.game_records().is_empty());
    }

    #[test]
    fn incorrect_words_are_deduplicated() {
        let mut s = store();
        let a = Character::new(1, "一", "yī");
        let b = Character::new(2, "二", "èr");
        s.add_incorrect_words([&a, &b]);
        s.add_incorrect_words([&a]);
        assert_eq!(s.incorrect_words(), vec![a, b]);
        s.clear_incorrect_words();
        assert!(s.incorrect_words().is_empty());
    }
}
