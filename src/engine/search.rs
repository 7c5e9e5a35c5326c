use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::dictionary::{Dictionary, ScoredWord};
use crate::engine::matcher::{Constraint, MatchResult, RackMatcher};
use crate::engine::rack::{self, InputValidation, RackSpec};
use crate::engine::ranking::{self, Ranked};
use crate::engine::scoring;
use crate::error::SearchError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub pattern: String,
    pub search_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<ScoredWord>,
    pub truncated: bool,
    pub elapsed_ms: f64,
    pub search_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn failed(search_id: u64, error: &SearchError, elapsed_ms: f64) -> Self {
        Self {
            results: Vec::new(),
            truncated: false,
            elapsed_ms,
            search_id,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Header text for the result count, e.g. `3 matches found` or
    /// `100+ matches found (showing top 100 by score)`.
    pub fn summary(&self) -> String {
        let count = self.results.len();
        if self.truncated {
            format!("{count}+ matches found (showing top {count} by score)")
        } else if count == 1 {
            "1 match found".to_string()
        } else {
            format!("{count} matches found")
        }
    }
}

/// Match, score and rank every dictionary entry against one request.
pub fn find_words(dictionary: &Dictionary, request: &SearchRequest) -> Result<Ranked, SearchError> {
    let pattern = request.pattern.trim();
    if let InputValidation::Invalid { reason } = rack::validate(pattern) {
        return Err(SearchError::InvalidPattern(reason));
    }

    let rack = RackSpec::analyze(pattern);
    let constraint = Constraint::new(request.starts_with.as_deref(), request.ends_with.as_deref());
    let matcher = RackMatcher::new(&rack, &constraint);

    let matches: Vec<ScoredWord> = dictionary
        .iter()
        .filter_map(|entry| match matcher.try_match(&entry.word) {
            MatchResult::Fits { wildcard_letters } if wildcard_letters.is_empty() => {
                Some(entry.clone())
            }
            MatchResult::Fits { wildcard_letters } => Some(ScoredWord {
                word: entry.word.clone(),
                score: scoring::score(&entry.word, &wildcard_letters),
            }),
            MatchResult::NoFit => None,
        })
        .collect();

    Ok(ranking::rank(matches))
}

/// Worker entry point. Never panics and never fails: faults are reported in
/// the response's `error` field with an empty result set.
pub fn run_search(dictionary: &Dictionary, request: &SearchRequest) -> SearchResponse {
    guarded(request.search_id, || find_words(dictionary, request))
}

/// Run `search`, timing it and turning an error or a panic into a failed
/// response for `search_id`.
fn guarded<F>(search_id: u64, search: F) -> SearchResponse
where
    F: FnOnce() -> Result<Ranked, SearchError>,
{
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(search))
        .unwrap_or_else(|payload| Err(SearchError::Panicked(panic_message(payload.as_ref()))));
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(Ranked { results, truncated }) => SearchResponse {
            results,
            truncated,
            elapsed_ms,
            search_id,
            error: None,
        },
        Err(err) => {
            warn!(search_id, %err, "search failed");
            SearchResponse::failed(search_id, &err, elapsed_ms)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pattern: &str, starts_with: Option<&str>, ends_with: Option<&str>) -> SearchRequest {
        SearchRequest {
            pattern: pattern.to_string(),
            search_id: 1,
            starts_with: starts_with.map(str::to_string),
            ends_with: ends_with.map(str::to_string),
        }
    }

    fn words(ranked: &Ranked) -> Vec<&str> {
        ranked.results.iter().map(|w| w.word.as_str()).collect()
    }

    #[test]
    fn test_find_words_rescoring_with_wildcards() {
        let dictionary = Dictionary::build(["QUO", "QUA", "QUIZ", "UT"]);
        let ranked = find_words(&dictionary, &request("QU?", None, None)).unwrap();
        // UT fits too, with the blank standing in for T
        assert_eq!(words(&ranked), ["QUO", "QUA", "UT"]);
        let scores: Vec<u32> = ranked.results.iter().map(|w| w.score).collect();
        assert_eq!(scores, [11, 11, 1]);
    }

    #[test]
    fn test_find_words_rescoring_can_reorder() {
        // ZA is worth 11 at base but only 1 when the Z is a blank; AXE keeps its X.
        let dictionary = Dictionary::build(["ZA", "AXE"]);
        let ranked = find_words(&dictionary, &request("AXE?", None, None)).unwrap();
        assert_eq!(words(&ranked), ["AXE", "ZA"]);
        assert_eq!(ranked.results[1].score, 1);
    }

    #[test]
    fn test_find_words_with_prefix() {
        let dictionary = Dictionary::build(["SCARE", "SCAR", "CARES", "SCARES", "RACE"]);
        let ranked = find_words(&dictionary, &request("care", Some("s"), None)).unwrap();
        assert_eq!(words(&ranked), ["SCARE", "SCAR"]);
    }

    #[test]
    fn test_find_words_rejects_invalid_pattern() {
        let dictionary = Dictionary::build(["AA"]);
        let err = find_words(&dictionary, &request("A", None, None)).unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidPattern(rack::TOO_SHORT_REASON.to_string())
        );
    }

    #[test]
    fn test_run_search_reports_errors_in_response() {
        let dictionary = Dictionary::build(["AA"]);
        let response = run_search(&dictionary, &request("A1", None, None));
        assert!(response.results.is_empty());
        assert!(!response.truncated);
        assert_eq!(response.error.as_deref(), Some(rack::INVALID_CHARS_REASON));
        assert_eq!(response.search_id, 1);
    }

    #[test]
    fn test_panicking_search_becomes_failed_response() {
        let response = guarded(9, || -> Result<Ranked, SearchError> {
            panic!("matcher exploded")
        });
        let error = response.error.as_deref().unwrap();
        assert!(error.starts_with("search panicked:"), "got {error}");
        assert!(error.contains("matcher exploded"));
        assert!(response.results.is_empty());
        assert!(!response.truncated);
        assert_eq!(response.search_id, 9);
    }

    #[test]
    fn test_summary_text() {
        let mut response = SearchResponse {
            results: vec![ScoredWord::new("AA")],
            truncated: false,
            elapsed_ms: 0.0,
            search_id: 1,
            error: None,
        };
        assert_eq!(response.summary(), "1 match found");
        response.results = (0..100).map(|_| ScoredWord::new("AA")).collect();
        response.truncated = true;
        assert_eq!(
            response.summary(),
            "100+ matches found (showing top 100 by score)"
        );
    }

    #[test]
    fn test_response_json_shape() {
        let response = SearchResponse {
            results: vec![ScoredWord::new("QUO")],
            truncated: false,
            elapsed_ms: 1.5,
            search_id: 7,
            error: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["searchId"], 7);
        assert_eq!(json["elapsedMs"], 1.5);
        assert_eq!(json["results"][0]["score"], 12);
        assert!(json.get("error").is_none());
    }
}
