//! Pinyin comparison helpers.
//!
//! Learner input is compared against the canonical (tone-marked) pinyin after both
//! sides are folded to plain lowercase Latin letters. Tones are never graded: `nǐ`,
//! `NI`, `ni3` all count as the same answer.

/// Tone-marked vowels and their base letters. The ü family folds to `v`, which is
/// what most pinyin keyboards use for ü.
const TONE_MAP: &[(char, char)] = &[
    ('ā', 'a'), ('á', 'a'), ('ǎ', 'a'), ('à', 'a'),
    ('ē', 'e'), ('é', 'e'), ('ě', 'e'), ('è', 'e'),
    ('ī', 'i'), ('í', 'i'), ('ǐ', 'i'), ('ì', 'i'),
    ('ō', 'o'), ('ó', 'o'), ('ǒ', 'o'), ('ò', 'o'),
    ('ū', 'u'), ('ú', 'u'), ('ǔ', 'u'), ('ù', 'u'),
    ('ǖ', 'v'), ('ǘ', 'v'), ('ǚ', 'v'), ('ǜ', 'v'), ('ü', 'v'),
    ('ɑ', 'a'),
];

/// Combining tone marks left behind by decomposed input (e.g. `ɑ` + U+0300).
const COMBINING_TONES: &[char] = &['\u{0300}', '\u{0301}', '\u{030C}', '\u{0304}'];

fn fold_char(c: char) -> Option<char> {
    if COMBINING_TONES.contains(&c) {
        return None;
    }
    // Numbered-tone input ("ni3") drops the digit.
    if matches!(c, '1'..='5') {
        return None;
    }
    Some(
        TONE_MAP
            .iter()
            .find(|(marked, _)| *marked == c)
            .map(|(_, base)| *base)
            .unwrap_or(c),
    )
}

/// Fold pinyin to lowercase, tone-free form and trim surrounding whitespace.
pub fn normalize(pinyin: &str) -> String {
    pinyin
        .to_lowercase()
        .chars()
        .filter_map(fold_char)
        .collect::<String>()
        .trim()
        .to_string()
}

/// True when `input` names the same syllables as `correct`.
pub fn validate(input: &str, correct: &str) -> bool {
    normalize(input) == normalize(correct)
}

/// Progressive hint for a character that has been missed `attempt_count` times.
pub fn hint(pinyin: &str, attempt_count: u32) -> String {
    match attempt_count {
        0 => {
            let first: String = pinyin.chars().take(1).collect();
            format!("Hint: Starts with \"{}\"", first)
        }
        1 => {
            let len = pinyin.chars().count();
            let half: String = pinyin.chars().take(len.div_ceil(2)).collect();
            format!("Hint: {}...", half)
        }
        _ => format!("Answer: {}", pinyin),
    }
}
