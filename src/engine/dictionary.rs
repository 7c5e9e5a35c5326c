use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::scoring;
use crate::error::DictionaryError;

#[derive(Embed)]
#[folder = "assets/wordlists/"]
struct WordListAssets;

const DEFAULT_WORD_LIST: &str = "words.txt";

static SHARED: OnceLock<Arc<Dictionary>> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: u32,
}

impl ScoredWord {
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();
        let score = scoring::base_score(&word);
        Self { word, score }
    }
}

/// Every word pre-scored at full letter value, sorted by descending score.
/// Never modified after construction.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: Vec<ScoredWord>,
}

impl Dictionary {
    /// Build from words that are already trimmed, upper-cased and non-empty.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<ScoredWord> = words.into_iter().map(ScoredWord::new).collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    /// Build from a newline-separated word list.
    pub fn from_word_list(text: &str) -> Self {
        Self::build(
            text.lines()
                .map(|line| line.trim().to_uppercase())
                .filter(|word| !word.is_empty()),
        )
    }

    /// The word list bundled into the binary.
    pub fn embedded() -> Self {
        match WordListAssets::get(DEFAULT_WORD_LIST) {
            Some(file) => Self::from_word_list(&String::from_utf8_lossy(file.data.as_ref())),
            None => {
                warn!("bundled word list {DEFAULT_WORD_LIST} is missing");
                Self::default()
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, DictionaryError> {
        let text = fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_word_list(&text);
        if dictionary.is_empty() {
            return Err(DictionaryError::Empty(path.to_path_buf()));
        }
        Ok(dictionary)
    }

    pub fn entries(&self) -> &[ScoredWord] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredWord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Install the process-wide dictionary. Only the first call (or the first
/// call to [`shared`]) wins.
pub fn install(dictionary: Dictionary) -> Result<Arc<Dictionary>, DictionaryError> {
    let mut installed = false;
    let shared = SHARED.get_or_init(|| {
        installed = true;
        log_ready(&dictionary, "custom", Instant::now());
        Arc::new(dictionary)
    });
    if installed {
        Ok(Arc::clone(shared))
    } else {
        Err(DictionaryError::AlreadyInstalled)
    }
}

/// The process-wide dictionary, built from the bundled word list on first use
/// unless one was installed earlier.
pub fn shared() -> Arc<Dictionary> {
    Arc::clone(SHARED.get_or_init(|| {
        let started = Instant::now();
        let dictionary = Dictionary::embedded();
        log_ready(&dictionary, "bundled", started);
        Arc::new(dictionary)
    }))
}

fn log_ready(dictionary: &Dictionary, source: &str, started: Instant) {
    info!(
        words = dictionary.len(),
        source,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "dictionary ready"
    );
}
