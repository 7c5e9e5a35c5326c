use std::cmp::Ordering;

use crate::engine::dictionary::ScoredWord;

pub const MAX_RESULTS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ranked {
    pub results: Vec<ScoredWord>,
    pub truncated: bool,
}

/// Highest score first, longer word first on a tie.
pub fn compare(a: &ScoredWord, b: &ScoredWord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.word.chars().count().cmp(&a.word.chars().count()))
}

pub fn rank(matches: Vec<ScoredWord>) -> Ranked {
    rank_top(matches, MAX_RESULTS)
}

/// Stable sort, so remaining ties keep the order the matches arrived in
/// (dictionary order).
pub fn rank_top(mut matches: Vec<ScoredWord>, limit: usize) -> Ranked {
    matches.sort_by(compare);
    let truncated = matches.len() > limit;
    matches.truncate(limit);
    Ranked {
        results: matches,
        truncated,
    }
}
