pub mod lab;

pub use lab::{load_phoneme_list, parse_phoneme_list};

/// Japanese phoneme inventory. A symbol's position is its id.
pub const PHONEME_INVENTORY: [&str; 39] = [
    "pau", "I", "N", "U", "a", "b", "by", "ch", "cl", "d", "dy", "e", "f", "g", "gy", "h", "hy",
    "i", "j", "k", "ky", "m", "my", "n", "ny", "o", "p", "py", "r", "ry", "s", "sh", "t", "ts",
    "u", "v", "w", "y", "z",
];

/// Symbol used for silence and pauses.
pub const PAUSE: &str = "pau";

/// Phonemes that anchor a mora: vowels, moraic nasal, devoiced vowels, geminate and pause.
pub const MORA_PHONEMES: [&str; 13] = [
    "a", "i", "u", "e", "o", "N", "A", "I", "U", "E", "O", "cl", "pau",
];

/// Phonemes expected to carry a measurable pitch.
pub const VOICED_PHONEMES: [&str; 21] = [
    "a", "i", "u", "e", "o", "N", "n", "m", "y", "r", "w", "g", "z", "j", "d", "b", "ny", "my",
    "ry", "gy", "by",
];

pub fn is_mora_phoneme(symbol: &str) -> bool {
    MORA_PHONEMES.contains(&symbol)
}

pub fn is_voiced(symbol: &str) -> bool {
    VOICED_PHONEMES.contains(&symbol)
}

/// Id of `symbol` in [`PHONEME_INVENTORY`], if it belongs to it.
pub fn phoneme_id(symbol: &str) -> Option<i64> {
    PHONEME_INVENTORY
        .iter()
        .position(|candidate| *candidate == symbol)
        .map(|idx| idx as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_is_id_zero() {
        assert_eq!(phoneme_id(PAUSE), Some(0));
        assert_eq!(phoneme_id("z"), Some(38));
        assert_eq!(phoneme_id("xx"), None);
    }

    #[test]
    fn vocabularies_are_consistent() {
        assert!(is_mora_phoneme("cl"));
        assert!(is_mora_phoneme("pau"));
        assert!(!is_mora_phoneme("k"));
        assert!(is_voiced("N"));
        assert!(is_voiced("by"));
        assert!(!is_voiced("k"));
        assert!(!is_voiced("pau"));
        assert!(!is_voiced("U"));
    }
}
