pub mod dictionary;
pub mod matcher;
pub mod rack;
pub mod ranking;
pub mod scoring;
pub mod search;

pub use dictionary::{Dictionary, ScoredWord};
pub use rack::{InputValidation, RackSpec, validate};
pub use search::{SearchRequest, SearchResponse, run_search};
