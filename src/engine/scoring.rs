use crate::engine::rack::LetterCounts;

/// Standard tile value of a letter. Anything outside A-Z is worth nothing.
pub fn letter_value(ch: char) -> u32 {
    match ch.to_ascii_uppercase() {
        'A' | 'E' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        'Q' | 'Z' => 10,
        _ => 0,
    }
}

/// Full value of a word with every letter played from a real tile.
pub fn base_score(word: &str) -> u32 {
    word.chars().map(letter_value).sum()
}

/// Score a word where the letter instances in `wildcard_letters` were played
/// with blank tiles. Each pending wildcard letter zeroes exactly one occurrence,
/// consumed left to right.
pub fn score(word: &str, wildcard_letters: &LetterCounts) -> u32 {
    if wildcard_letters.is_empty() {
        return base_score(word);
    }
    let mut pending = wildcard_letters.clone();
    word.chars()
        .map(|ch| {
            if pending.take_one(ch) {
                0
            } else {
                letter_value(ch)
            }
        })
        .sum()
}

/// Per-letter values joined with `+`, e.g. `QUO` -> `10+1+1`.
pub fn breakdown(word: &str) -> String {
    word.chars()
        .map(|ch| letter_value(ch).to_string())
        .collect::<Vec<_>>()
        .join("+")
}
