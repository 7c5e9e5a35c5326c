pub mod orchestrator;
pub mod worker;

pub use orchestrator::{SearchDispatcher, SearchOrchestrator, SearchQuery, SearchState};
pub use worker::SearchWorker;
