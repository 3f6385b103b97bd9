use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A post as returned by the scraper.
///
/// Only the fields the layer reads are typed; everything else the scraper
/// returned is kept in `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default, alias = "ticker", skip_serializing_if = "Option::is_none")]
    pub ticker_searched: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    pub fn new(title: impl Into<String>, permalink: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            permalink: permalink.into(),
            ..Default::default()
        }
    }

    pub fn tag_subreddit(&mut self, subreddit: &str) {
        self.subreddit = Some(subreddit.to_string());
    }

    pub fn tag_ticker(&mut self, ticker: &str) {
        self.ticker_searched = Some(ticker.to_string());
    }

    /// Full link to the post on reddit.com.
    pub fn url(&self) -> String {
        format!("https://reddit.com{}", self.permalink)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// This comment plus every reply beneath it.
    pub fn thread_size(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_size).sum::<usize>()
    }
}

/// A post together with its comment tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostDetails {
    pub fn total_comments(&self) -> usize {
        self.comments.iter().map(Comment::thread_size).sum()
    }
}

/// Posts keyed by the subreddit they came from.
pub type SubredditBatch = BTreeMap<String, Vec<Post>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Hot,
    Top,
    New,
    Rising,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hot => "hot",
            Category::Top => "top",
            Category::New => "new",
            Category::Rising => "rising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Hot => "hot",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

macro_rules! str_enum_impls {
    ($ty:ident, $what:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                $(
                    if lowered == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!("unknown {}: {}", $what, s))
            }
        }
    };
}

str_enum_impls!(Category, "category", [Hot, Top, New, Rising]);
str_enum_impls!(TimeFilter, "time filter", [Hour, Day, Week, Month, Year, All]);
str_enum_impls!(SearchSort, "search sort", [Relevance, Hot, Top, New, Comments]);
