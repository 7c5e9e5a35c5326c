use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MIN_PATTERN_LEN: usize = 2;
pub const TOO_SHORT_REASON: &str = "Enter at least 2 letters to search.";
pub const INVALID_CHARS_REASON: &str = "Only letters and wildcards (? or _) are allowed.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputValidation {
    Valid,
    Invalid { reason: String },
}

impl InputValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, InputValidation::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            InputValidation::Valid => None,
            InputValidation::Invalid { reason } => Some(reason.as_str()),
        }
    }

    fn invalid(reason: &str) -> Self {
        InputValidation::Invalid {
            reason: reason.to_string(),
        }
    }
}

pub fn is_wildcard(ch: char) -> bool {
    ch == '?' || ch == '_'
}

/// Check a raw rack pattern before any search is issued. Only the rack is
/// validated; prefix and suffix filters are taken literally.
pub fn validate(pattern: &str) -> InputValidation {
    let trimmed = pattern.trim();
    if trimmed.chars().count() < MIN_PATTERN_LEN {
        return InputValidation::invalid(TOO_SHORT_REASON);
    }
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_alphabetic() || is_wildcard(ch))
    {
        return InputValidation::invalid(INVALID_CHARS_REASON);
    }
    InputValidation::Valid
}

/// Multiset of letters. Iteration is ordered by letter so that anything
/// derived from it (wildcard assignment, rendering) is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterCounts {
    counts: BTreeMap<char, usize>,
}

impl LetterCounts {
    pub fn from_letters(letters: impl IntoIterator<Item = char>) -> Self {
        let mut counts = Self::default();
        for ch in letters {
            counts.add(ch, 1);
        }
        counts
    }

    pub fn get(&self, ch: char) -> usize {
        self.counts.get(&ch).copied().unwrap_or(0)
    }

    pub fn add(&mut self, ch: char, n: usize) {
        if n > 0 {
            *self.counts.entry(ch).or_insert(0) += n;
        }
    }

    /// Remove one occurrence of `ch`. Returns false if none was left.
    pub fn take_one(&mut self, ch: char) -> bool {
        match self.counts.get_mut(&ch) {
            Some(n) if *n > 1 => {
                *n -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&ch);
                true
            }
            None => false,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(&ch, &n)| (ch, n))
    }

    /// Letters expanded back into a sorted string, e.g. `{A:2, B:1}` -> `AAB`.
    pub fn to_letters(&self) -> String {
        self.iter()
            .flat_map(|(ch, n)| std::iter::repeat_n(ch, n))
            .collect()
    }
}

/// The tiles available for one query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RackSpec {
    pub counts: LetterCounts,
    pub wildcards: usize,
}

impl RackSpec {
    /// Parse an already validated pattern. `?` and `_` become wildcards and
    /// never count as letters.
    pub fn analyze(pattern: &str) -> Self {
        let mut rack = Self::default();
        for ch in pattern.trim().chars().flat_map(char::to_uppercase) {
            if is_wildcard(ch) {
                rack.wildcards += 1;
            } else {
                rack.counts.add(ch, 1);
            }
        }
        rack
    }

    /// Number of tiles on the rack, blanks included.
    pub fn tile_count(&self) -> usize {
        self.counts.total() + self.wildcards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_too_short() {
        assert_eq!(
            validate("A"),
            InputValidation::Invalid {
                reason: TOO_SHORT_REASON.to_string()
            }
        );
        assert_eq!(validate("  b  ").reason(), Some(TOO_SHORT_REASON));
        assert_eq!(validate("").reason(), Some(TOO_SHORT_REASON));
    }

    #[test]
    fn test_validate_rejects_other_characters() {
        assert_eq!(validate("AB1").reason(), Some(INVALID_CHARS_REASON));
        assert_eq!(validate("A B").reason(), Some(INVALID_CHARS_REASON));
        assert_eq!(validate("ÉTÉ").reason(), Some(INVALID_CHARS_REASON));
    }

    #[test]
    fn test_validate_accepts_letters_and_wildcards() {
        assert!(validate("qu?").is_valid());
        assert!(validate("  AELRST  ").is_valid());
        assert!(validate("__").is_valid());
    }

    #[test]
    fn test_analyze_counts_letters_and_wildcards_separately() {
        let rack = RackSpec::analyze("aab?_");
        assert_eq!(rack.counts.get('A'), 2);
        assert_eq!(rack.counts.get('B'), 1);
        assert_eq!(rack.counts.get('?'), 0);
        assert_eq!(rack.counts.get('_'), 0);
        assert_eq!(rack.wildcards, 2);
        assert_eq!(rack.tile_count(), 5);
    }

    #[test]
    fn test_letter_counts_take_one() {
        let mut counts = LetterCounts::from_letters("ZZA".chars());
        assert!(counts.take_one('Z'));
        assert_eq!(counts.get('Z'), 1);
        assert!(counts.take_one('Z'));
        assert!(!counts.take_one('Z'));
        assert_eq!(counts.to_letters(), "A");
    }
}
