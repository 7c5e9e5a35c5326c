use std::path::PathBuf;

use thiserror::Error;

/// Faults raised while executing a search. These never escape the worker;
/// they are rendered into `SearchResponse::error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0}")]
    InvalidPattern(String),

    #[error("search panicked: {0}")]
    Panicked(String),

    #[error("search worker is unavailable")]
    WorkerUnavailable,
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("dictionary has already been installed")]
    AlreadyInstalled,

    #[error("failed to read word list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list {} contains no words", .0.display())]
    Empty(PathBuf),
}
