use crate::engine::rack::{LetterCounts, RackSpec};

/// Literal prefix/suffix filters, stored upper-cased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraint {
    pub starts_with: String,
    pub ends_with: String,
}

impl Constraint {
    pub fn new(starts_with: Option<&str>, ends_with: Option<&str>) -> Self {
        let normalize = |s: Option<&str>| s.map(|s| s.trim().to_uppercase()).unwrap_or_default();
        Self {
            starts_with: normalize(starts_with),
            ends_with: normalize(ends_with),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.starts_with.is_empty() && self.ends_with.is_empty()
    }

    /// Extra word length the filters allow beyond the rack itself.
    pub fn extra_len(&self) -> usize {
        self.starts_with.chars().count() + self.ends_with.chars().count()
    }

    /// Letters the filters place on the board for free.
    pub fn implicit_letters(&self) -> LetterCounts {
        LetterCounts::from_letters(self.starts_with.chars().chain(self.ends_with.chars()))
    }

    /// The prefix and suffix must both appear literally. They may overlap.
    pub fn admits(&self, word: &str) -> bool {
        word.starts_with(self.starts_with.as_str()) && word.ends_with(self.ends_with.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Fits { wildcard_letters: LetterCounts },
    NoFit,
}

impl MatchResult {
    pub fn fits(&self) -> bool {
        matches!(self, MatchResult::Fits { .. })
    }

    pub fn wildcard_letters(&self) -> Option<&LetterCounts> {
        match self {
            MatchResult::Fits { wildcard_letters } => Some(wildcard_letters),
            MatchResult::NoFit => None,
        }
    }
}

/// Multiset feasibility test. Every letter of `word` is drawn from the rack
/// or from `implicit`; whatever is still short is covered by wildcards, and
/// the word fits iff the total shortfall does not exceed the blanks on hand.
///
/// Assigning blanks to exactly the short letters is optimal: blanks are
/// interchangeable, so any feasible assignment needs at least the per-letter
/// shortfall and this one uses no more.
pub fn matches(word: &str, rack: &RackSpec, implicit: &LetterCounts) -> MatchResult {
    let needed = LetterCounts::from_letters(word.chars());
    let mut wildcard_letters = LetterCounts::default();
    let mut total_shortfall = 0;

    for (letter, need) in needed.iter() {
        let available = rack.counts.get(letter) + implicit.get(letter);
        let shortfall = need.saturating_sub(available);
        if shortfall == 0 {
            continue;
        }
        total_shortfall += shortfall;
        if total_shortfall > rack.wildcards {
            return MatchResult::NoFit;
        }
        wildcard_letters.add(letter, shortfall);
    }

    MatchResult::Fits { wildcard_letters }
}

/// Per-query matcher: the rack and constraint are fixed once and each
/// dictionary entry is run through the cheap filters before the multiset test.
pub struct RackMatcher<'a> {
    rack: &'a RackSpec,
    constraint: &'a Constraint,
    implicit: LetterCounts,
    max_len: usize,
}

impl<'a> RackMatcher<'a> {
    pub fn new(rack: &'a RackSpec, constraint: &'a Constraint) -> Self {
        Self {
            rack,
            constraint,
            implicit: constraint.implicit_letters(),
            max_len: rack.tile_count() + constraint.extra_len(),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn try_match(&self, word: &str) -> MatchResult {
        // Dictionary words are ASCII in practice; fall back to a char count otherwise.
        let len = if word.is_ascii() {
            word.len()
        } else {
            word.chars().count()
        };
        if len > self.max_len {
            return MatchResult::NoFit;
        }
        if !self.constraint.is_empty() && !self.constraint.admits(word) {
            return MatchResult::NoFit;
        }
        matches(word, self.rack, &self.implicit)
    }
}
