use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::rack::{self, InputValidation};
use crate::engine::search::{SearchRequest, SearchResponse};
use crate::error::SearchError;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// The isolated execution context searches are handed to.
pub trait SearchDispatcher {
    fn dispatch(&mut self, request: SearchRequest) -> Result<(), SearchError>;

    /// Next completed response, if any, without blocking.
    fn try_recv(&mut self) -> Option<SearchResponse>;
}

/// What the user has typed: the rack plus the two optional filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub pattern: String,
    #[serde(default)]
    pub starts_with: String,
    #[serde(default)]
    pub ends_with: String,
}

impl SearchQuery {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, starts_with: &str, ends_with: &str) -> Self {
        self.starts_with = starts_with.to_string();
        self.ends_with = ends_with.to_string();
        self
    }

    pub fn to_request(&self, search_id: u64) -> SearchRequest {
        let filter = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        SearchRequest {
            pattern: self.pattern.trim().to_string(),
            search_id,
            starts_with: filter(&self.starts_with),
            ends_with: filter(&self.ends_with),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Debouncing,
    Searching,
    Settled,
}

#[derive(Clone, Debug)]
struct PendingSearch {
    query: SearchQuery,
    deadline: Instant,
}

/// Owns the request lifecycle: validation, debounce, id allocation, dispatch,
/// and last-issued-wins publication. Time is passed in explicitly so the
/// state machine can be driven deterministically.
pub struct SearchOrchestrator<D: SearchDispatcher> {
    dispatcher: D,
    debounce: Duration,
    state: SearchState,
    validation: Option<InputValidation>,
    pending: Option<PendingSearch>,
    last_issued: u64,
    response: Option<SearchResponse>,
}

impl<D: SearchDispatcher> SearchOrchestrator<D> {
    pub fn new(dispatcher: D, debounce: Duration) -> Self {
        Self {
            dispatcher,
            debounce,
            state: SearchState::Idle,
            validation: None,
            pending: None,
            last_issued: 0,
            response: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn validation(&self) -> Option<&InputValidation> {
        self.validation.as_ref()
    }

    /// The most recently published response.
    pub fn response(&self) -> Option<&SearchResponse> {
        self.response.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.state == SearchState::Searching
    }

    /// Id of the most recently issued request, 0 before the first one.
    pub fn current_search_id(&self) -> u64 {
        self.last_issued
    }

    #[cfg(test)]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Record an edit. Any pending debounce is cancelled; a valid query
    /// restarts it, an invalid one settles immediately with no results.
    pub fn input_changed(&mut self, query: SearchQuery, now: Instant) -> &InputValidation {
        let validation = rack::validate(&query.pattern);
        self.pending = None;

        if validation.is_valid() {
            self.pending = Some(PendingSearch {
                query,
                deadline: now + self.debounce,
            });
            self.state = SearchState::Debouncing;
        } else {
            self.response = None;
            self.state = SearchState::Settled;
        }

        self.validation.insert(validation)
    }

    /// Fire an expired debounce and drain finished searches. Returns true if
    /// anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = self.fire_if_due(now);
        while let Some(response) = self.dispatcher.try_recv() {
            changed |= self.receive(response);
        }
        changed
    }

    fn fire_if_due(&mut self, now: Instant) -> bool {
        if !self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.last_issued += 1;
        let search_id = self.last_issued;
        let request = pending.query.to_request(search_id);
        self.state = SearchState::Searching;
        debug!(search_id, pattern = %request.pattern, "dispatching search");

        if let Err(err) = self.dispatcher.dispatch(request) {
            warn!(search_id, %err, "search dispatch failed");
            self.response = Some(SearchResponse::failed(search_id, &err, 0.0));
            self.state = SearchState::Settled;
        }
        true
    }

    /// Accept a response only if it answers the most recently issued request
    /// and the input has not since become invalid. Returns true if published.
    pub fn receive(&mut self, response: SearchResponse) -> bool {
        let input_valid = self.validation.as_ref().is_some_and(InputValidation::is_valid);
        if response.search_id != self.last_issued || !input_valid {
            debug!(
                search_id = response.search_id,
                current = self.last_issued,
                "discarding stale search response"
            );
            return false;
        }

        debug!(
            search_id = response.search_id,
            results = response.results.len(),
            "publishing search response"
        );
        // A newer edit may already be debouncing; leave that cycle running.
        if self.state == SearchState::Searching {
            self.state = SearchState::Settled;
        }
        self.response = Some(response);
        true
    }
}
