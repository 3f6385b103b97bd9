//! Per-unit outcomes for best-effort scraping.
//!
//! Every collaborator call is one unit of work. A failed unit never aborts its
//! siblings; it degrades to "no results" and is recorded as a [`UnitFailure`]
//! so reports can say which parts of a run came back empty because of an error.

use crate::{CoreError, ErrorExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A single collaborator call the layer made on the caller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkUnit {
    /// Listing a subreddit by category.
    SubredditListing { subreddit: String },
    /// Searching a subreddit for a query (usually a ticker).
    SubredditSearch { subreddit: String, query: String },
    /// Fetching a post with its comments.
    PostDetails { permalink: String },
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkUnit::SubredditListing { subreddit } => write!(f, "listing r/{}", subreddit),
            WorkUnit::SubredditSearch { subreddit, query } => {
                write!(f, "search r/{} for {}", subreddit, query)
            }
            WorkUnit::PostDetails { permalink } => write!(f, "details {}", permalink),
        }
    }
}

/// Why a unit of work produced no results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub unit: WorkUnit,
    pub error_code: String,
    pub reason: String,
}

impl UnitFailure {
    /// Collaborator failures keep their specific code (`SCRAPER_RATE_LIMIT`,
    /// `SCRAPER_FORBIDDEN`, ...) rather than the umbrella `SCRAPER`.
    pub fn from_error(unit: WorkUnit, error: &CoreError) -> Self {
        let error_code = match error {
            CoreError::Scraper(inner) => inner.error_code(),
            other => other.error_code(),
        };
        Self {
            unit,
            error_code,
            reason: error.to_string(),
        }
    }
}

/// Result of one unit of work.
#[derive(Debug)]
pub enum UnitOutcome<T> {
    /// The collaborator answered, possibly with an empty result.
    Fetched(T),
    /// The collaborator failed; the unit counts as "no results".
    Failed(UnitFailure),
}

impl<T> UnitOutcome<T> {
    /// Converts a collaborator result, logging the failure if there is one.
    pub fn from_result(unit: WorkUnit, result: Result<T, CoreError>) -> Self {
        match result {
            Ok(value) => UnitOutcome::Fetched(value),
            Err(error) => {
                warn!(
                    code = %error.error_code(),
                    "Error during {}: {}",
                    unit,
                    error.user_friendly_message()
                );
                UnitOutcome::Failed(UnitFailure::from_error(unit, &error))
            }
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, UnitOutcome::Fetched(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UnitOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&UnitFailure> {
        match self {
            UnitOutcome::Failed(failure) => Some(failure),
            UnitOutcome::Fetched(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            UnitOutcome::Fetched(value) => Some(value),
            UnitOutcome::Failed(_) => None,
        }
    }
}

impl<T: Default> UnitOutcome<T> {
    /// The fetched value, or the empty value for a failed unit.
    pub fn unwrap_or_empty(self) -> T {
        self.into_value().unwrap_or_default()
    }
}

/// Data gathered across several units of work, with the units that failed.
#[derive(Debug, Clone, Default)]
pub struct Partial<T> {
    pub data: T,
    pub failures: Vec<UnitFailure>,
}

impl<T> Partial<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_failure(&mut self, failure: UnitFailure) {
        self.failures.push(failure);
    }

    pub fn into_data(self) -> T {
        self.data
    }
}
