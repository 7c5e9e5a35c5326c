use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::orchestrator::SearchQuery;

pub const SCHEMA_VERSION: u32 = 1;

/// The last rack and filters the user typed. Results are never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LastQueryData {
    pub schema_version: u32,
    pub pattern: String,
    #[serde(default)]
    pub starts_with: String,
    #[serde(default)]
    pub ends_with: String,
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for LastQueryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            pattern: String::new(),
            starts_with: String::new(),
            ends_with: String::new(),
            saved_at: None,
        }
    }
}

impl LastQueryData {
    pub fn from_query(query: &SearchQuery) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            pattern: query.pattern.clone(),
            starts_with: query.starts_with.clone(),
            ends_with: query.ends_with.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::new(&self.pattern).with_filters(&self.starts_with, &self.ends_with)
    }

    /// Check if loaded data has a stale schema version and should be ignored.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
