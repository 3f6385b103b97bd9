//! Per-ticker reports built from tagged posts.

use crate::outcome::UnitFailure;
use crate::types::Post;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket for posts that carry no subreddit tag.
pub const UNKNOWN_SUBREDDIT: &str = "unknown";

/// Everything found for one ticker in one run.
///
/// Built once from the posts gathered for the ticker; the counts are derived
/// from `posts` at construction so `total_mentions` and `by_subreddit` always
/// agree with it. Reports are write-only output, so there is no
/// `Deserialize` that could bypass that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerReport {
    ticker: String,
    timestamp: DateTime<Utc>,
    total_mentions: usize,
    posts: Vec<Post>,
    by_subreddit: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<UnitFailure>,
}

impl TickerReport {
    pub fn from_posts(ticker: impl Into<String>, posts: Vec<Post>) -> Self {
        Self::build(ticker.into(), Utc::now(), posts, Vec::new())
    }

    pub fn with_failures(
        ticker: impl Into<String>,
        posts: Vec<Post>,
        failures: Vec<UnitFailure>,
    ) -> Self {
        Self::build(ticker.into(), Utc::now(), posts, failures)
    }

    fn build(
        ticker: String,
        timestamp: DateTime<Utc>,
        posts: Vec<Post>,
        failures: Vec<UnitFailure>,
    ) -> Self {
        let by_subreddit = count_by_subreddit(&posts);
        Self {
            ticker,
            timestamp,
            total_mentions: posts.len(),
            posts,
            by_subreddit,
            failures,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn total_mentions(&self) -> usize {
        self.total_mentions
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn by_subreddit(&self) -> &BTreeMap<String, usize> {
        &self.by_subreddit
    }

    /// Units of work that failed while gathering this ticker's posts.
    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }
}

/// Counts posts per `subreddit` tag; untagged posts land in [`UNKNOWN_SUBREDDIT`].
pub fn count_by_subreddit(posts: &[Post]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for post in posts {
        let subreddit = post.subreddit.as_deref().unwrap_or(UNKNOWN_SUBREDDIT);
        *counts.entry(subreddit.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Reports keyed by ticker.
pub type SentimentData = BTreeMap<String, TickerReport>;

/// Top-level document of a multi-ticker run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiTickerSummary {
    pub timestamp: DateTime<Utc>,
    pub tickers: SentimentData,
}

impl MultiTickerSummary {
    pub fn new(tickers: SentimentData) -> Self {
        Self {
            timestamp: Utc::now(),
            tickers,
        }
    }

    pub fn total_mentions(&self) -> usize {
        self.tickers.values().map(TickerReport::total_mentions).sum()
    }
}
