use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::engine::dictionary::Dictionary;
use crate::engine::search::{SearchRequest, SearchResponse, run_search};
use crate::error::SearchError;
use crate::session::orchestrator::SearchDispatcher;

/// Runs each search on its own thread against a shared, read-only dictionary.
/// Requests go out by value, responses come back over a channel; the worker
/// threads share nothing mutable with the caller.
pub struct SearchWorker {
    dictionary: Arc<Dictionary>,
    tx: Sender<SearchResponse>,
    rx: Receiver<SearchResponse>,
}

impl SearchWorker {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { dictionary, tx, rx }
    }

    /// Block until a response arrives or `timeout` elapses.
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<SearchResponse> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl SearchDispatcher for SearchWorker {
    fn dispatch(&mut self, request: SearchRequest) -> Result<(), SearchError> {
        let dictionary = Arc::clone(&self.dictionary);
        let tx = self.tx.clone();
        let search_id = request.search_id;

        thread::Builder::new()
            .name(format!("rackr-search-{search_id}"))
            .spawn(move || {
                let response = run_search(&dictionary, &request);
                debug!(
                    search_id,
                    results = response.results.len(),
                    elapsed_ms = response.elapsed_ms,
                    "search finished"
                );
                // Receiver gone means the front end shut down; nothing to report to.
                let _ = tx.send(response);
            })
            .map(|_| ())
            .map_err(|err| {
                warn!(search_id, %err, "failed to spawn search thread");
                SearchError::WorkerUnavailable
            })
    }

    fn try_recv(&mut self) -> Option<SearchResponse> {
        self.rx.try_recv().ok()
    }
}
