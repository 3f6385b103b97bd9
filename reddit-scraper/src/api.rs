use crate::capability::ScraperCapability;
use async_trait::async_trait;
use reqwest::{Client, Proxy, Response, StatusCode};
use sentiment_core::{
    Category, Comment, CoreError, Post, PostDetails, ScraperError, SearchSort, TimeFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

const REDDIT_WEB_BASE: &str = "https://www.reddit.com";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const USER_AGENTS: &[&str] = &[
    DEFAULT_USER_AGENT,
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.1; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

impl RedditListing<Post> {
    fn into_posts(self) -> Vec<Post> {
        self.data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| child.data)
            .collect()
    }
}

/// Settings the scraper is constructed with.
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub random_user_agent: bool,
    pub base_url: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Duration::from_secs(15),
            random_user_agent: true,
            base_url: REDDIT_WEB_BASE.to_string(),
        }
    }
}

/// Scraper backed by Reddit's public `.json` pages.
#[derive(Debug)]
pub struct RedditJsonScraper {
    http_client: Client,
    base_url: Url,
    random_user_agent: bool,
}

impl RedditJsonScraper {
    pub fn new(settings: ScraperSettings) -> Result<Self, CoreError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| init_failed(e.to_string()))?;

        let mut builder = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(settings.timeout);

        if let Some(proxy_url) = settings.proxy.as_deref() {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| init_failed(format!("invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let http_client = builder
            .build()
            .map_err(|e| init_failed(format!("failed to create HTTP client: {}", e)))?;

        debug!(
            base_url = %base_url,
            proxied = settings.proxy.is_some(),
            "Reddit JSON scraper ready"
        );

        Ok(Self {
            http_client,
            base_url,
            random_user_agent: settings.random_user_agent,
        })
    }

    fn user_agent(&self) -> &'static str {
        if self.random_user_agent {
            USER_AGENTS[fastrand::usize(..USER_AGENTS.len())]
        } else {
            DEFAULT_USER_AGENT
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, CoreError> {
        self.base_url.join(path).map_err(|e| {
            CoreError::InvalidInput {
                message: format!("cannot build URL for {}: {}", path, e),
            }
        })
    }

    async fn get(&self, path: &str, query_params: &[(&str, &str)]) -> Result<Response, CoreError> {
        let url = self.endpoint_url(path)?;

        let mut request_builder = self
            .http_client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent());
        if !query_params.is_empty() {
            request_builder = request_builder.query(query_params);
        }

        debug!("Requesting {}", path);
        let response = match request_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for {}: {}", path, e);
                if e.is_timeout() {
                    return Err(ScraperError::RequestTimeout.into());
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, path);
            return Ok(response);
        }

        warn!("Request failed with status: {} for {}", status, path);
        Err(status_error(status, &response, path).into())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        let response = self.get(path, query_params).await?;
        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse response for {}: {}", path, e);
            ScraperError::InvalidResponse {
                details: format!("unexpected JSON from {}", path),
            }
            .into()
        })
    }
}

fn init_failed(reason: String) -> CoreError {
    ScraperError::InitializationFailed { reason }.into()
}

fn status_error(status: StatusCode, response: &Response, path: &str) -> ScraperError {
    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(60);
            ScraperError::RateLimitExceeded { retry_after }
        }
        401 | 403 => ScraperError::Forbidden {
            resource: path.to_string(),
        },
        404 => match subreddit_from_path(path) {
            Some(subreddit) if !path.contains("/comments/") => {
                ScraperError::SubredditNotFound { subreddit }
            }
            _ => ScraperError::PostNotFound {
                permalink: path.to_string(),
            },
        },
        code if status.is_server_error() => ScraperError::ServerError { status_code: code },
        code => ScraperError::InvalidResponse {
            details: format!("unexpected status {} for {}", code, path),
        },
    }
}

fn subreddit_from_path(path: &str) -> Option<String> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("r"), Some(name)) if !name.is_empty() => Some(name.to_string()),
        _ => None,
    }
}

/// Reduces a permalink or full post URL to the `/r/.../comments/...` path.
pub fn normalize_permalink(permalink: &str) -> Result<String, CoreError> {
    let trimmed = permalink.trim();
    let path = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Url::parse(trimmed)
            .map_err(|e| CoreError::InvalidInput {
                message: format!("invalid post URL {}: {}", trimmed, e),
            })?
            .path()
            .to_string()
    } else {
        trimmed.to_string()
    };

    if !path.contains("/comments/") {
        return Err(CoreError::InvalidInput {
            message: format!("not a post permalink: {}", permalink),
        });
    }

    let path = path.trim_end_matches('/').trim_end_matches(".json");
    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{}", path))
    }
}

/// Builds a post-with-comments from the two listings Reddit returns for a
/// permalink: the post itself, then its comment tree.
fn parse_post_details(listings: Vec<Value>) -> Option<PostDetails> {
    let mut listings = listings.into_iter();
    let post_listing = listings.next()?;
    let mut post_data = post_listing
        .pointer("/data/children/0/data")
        .and_then(Value::as_object)
        .cloned()?;

    let title = take_string(&mut post_data, "title");
    let body = take_string(&mut post_data, "selftext");
    let comments = listings
        .next()
        .map(|listing| parse_comments(&listing))
        .unwrap_or_default();

    Some(PostDetails {
        title,
        body,
        comments,
        extra: post_data,
    })
}

fn take_string(data: &mut Map<String, Value>, key: &str) -> String {
    match data.remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

fn parse_comments(listing: &Value) -> Vec<Comment> {
    let Some(children) = listing.pointer("/data/children").and_then(Value::as_array) else {
        return Vec::new();
    };

    children
        .iter()
        // "more" stubs carry no comment body
        .filter(|child| child.get("kind").and_then(Value::as_str) == Some("t1"))
        .filter_map(|child| child.get("data"))
        .map(|data| Comment {
            author: data
                .get("author")
                .and_then(Value::as_str)
                .unwrap_or("[deleted]")
                .to_string(),
            body: data
                .get("body")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            score: data.get("score").and_then(Value::as_i64).unwrap_or(0),
            replies: data.get("replies").map(parse_comments).unwrap_or_default(),
        })
        .collect()
}

#[async_trait]
impl ScraperCapability for RedditJsonScraper {
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        limit: u32,
        category: Category,
        time_filter: TimeFilter,
    ) -> Result<Vec<Post>, CoreError> {
        let path = format!("/r/{}/{}.json", subreddit, category.as_str());
        let limit_str = limit.to_string();
        let params = [
            ("limit", limit_str.as_str()),
            ("t", time_filter.as_str()),
            ("raw_json", "1"),
        ];

        let listing: RedditListing<Post> = self.get_json(&path, &params).await?;
        let posts = listing.into_posts();
        info!("Retrieved {} posts from r/{}", posts.len(), subreddit);
        Ok(posts)
    }

    async fn search_subreddit(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
        sort: SearchSort,
    ) -> Result<Vec<Post>, CoreError> {
        let path = format!("/r/{}/search.json", subreddit);
        let limit_str = limit.to_string();
        let params = [
            ("q", query),
            ("restrict_sr", "on"),
            ("limit", limit_str.as_str()),
            ("sort", sort.as_str()),
            ("raw_json", "1"),
        ];

        let listing: RedditListing<Post> = self.get_json(&path, &params).await?;
        let posts = listing.into_posts();
        info!(
            "Search for {} in r/{} returned {} posts",
            query,
            subreddit,
            posts.len()
        );
        Ok(posts)
    }

    async fn scrape_post_details(&self, permalink: &str) -> Result<Option<PostDetails>, CoreError> {
        let path = format!("{}.json", normalize_permalink(permalink)?);
        let listings: Vec<Value> = self.get_json(&path, &[("raw_json", "1")]).await?;
        let details = parse_post_details(listings);

        match &details {
            Some(details) => debug!(
                "Retrieved post {} with {} comments",
                permalink,
                details.total_comments()
            ),
            None => warn!("Post {} returned no post data", permalink),
        }
        Ok(details)
    }
}
