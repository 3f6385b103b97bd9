use crate::api::{RedditJsonScraper, ScraperSettings};
use crate::capability::ScraperCapability;
use crate::delay::DelayController;
use sentiment_core::{
    Category, CoreError, Partial, Post, PostDetails, SearchSort, SentimentConfig, SubredditBatch,
    TimeFilter, UnitOutcome, WorkUnit,
};
use tracing::{info, warn};

pub const DEFAULT_POST_LIMIT: u32 = 50;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_MULTI_LIMIT: u32 = 30;

pub(crate) fn rate_limit_label(rate_limit_per_minute: Option<i64>) -> String {
    match rate_limit_per_minute {
        Some(rate) => format!("{} req/min", rate),
        None => "unset".to_string(),
    }
}

/// Ticker- and subreddit-oriented view over a [`ScraperCapability`].
///
/// Every collaborator call is followed by exactly one
/// [`DelayController::wait`], whether the call succeeded or not. Failures are
/// logged and become empty results; the `*_outcome` variants also hand back
/// which units failed.
pub struct RedditSentimentClient<S> {
    scraper: S,
    enabled: bool,
    subreddits: Vec<String>,
    delay: DelayController,
}

impl RedditSentimentClient<RedditJsonScraper> {
    /// Builds the HTTP scraper from the config. Failing to build it is fatal
    /// for the run.
    pub fn from_config(config: &SentimentConfig) -> Result<Self, CoreError> {
        let scraper = RedditJsonScraper::new(ScraperSettings {
            proxy: config.reddit_proxy.clone(),
            timeout: config.request_timeout(),
            random_user_agent: config.random_user_agent,
            ..Default::default()
        })?;
        Ok(Self::with_scraper(config, scraper))
    }
}

impl<S: ScraperCapability> RedditSentimentClient<S> {
    pub fn with_scraper(config: &SentimentConfig, scraper: S) -> Self {
        let client = Self {
            scraper,
            enabled: config.is_enabled(),
            subreddits: config.subreddits.clone(),
            delay: DelayController::from_rate_limit(config.rate_limit_per_minute),
        };
        client.log_startup(config);
        client
    }

    pub fn with_delay_controller(mut self, delay: DelayController) -> Self {
        self.delay = delay;
        self
    }

    fn log_startup(&self, config: &SentimentConfig) {
        match config.reddit_proxy.as_deref() {
            Some(proxy) => {
                let shown: String = proxy.chars().take(30).collect();
                info!("Using proxy: {}...", shown);
            }
            None => {
                warn!("No proxy configured! Reddit may ban your IP.");
                warn!("Add 'reddit_proxy' to your config or set the REDDIT_PROXY env var");
            }
        }

        let proxy_state = if config.reddit_proxy.is_some() {
            "enabled"
        } else {
            "DISABLED (risky)"
        };
        info!(
            enabled = self.enabled,
            proxy = proxy_state,
            "Reddit client initialized"
        );
        info!(
            "Rate limit: {} (min delay {:?})",
            rate_limit_label(config.rate_limit_per_minute),
            self.delay.min_delay()
        );
        info!("Subreddits: {}", self.subreddits.join(", "));
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    pub fn delay_controller(&self) -> &DelayController {
        &self.delay
    }

    pub fn scraper(&self) -> &S {
        &self.scraper
    }

    pub(crate) fn resolve_subreddits<'a>(&'a self, subreddits: Option<&'a [String]>) -> &'a [String] {
        subreddits.unwrap_or(&self.subreddits)
    }

    /// Posts from one subreddit; empty when disabled or on failure.
    pub async fn get_subreddit_posts(
        &self,
        subreddit: &str,
        limit: u32,
        category: Category,
        time_filter: TimeFilter,
    ) -> Vec<Post> {
        self.get_subreddit_posts_outcome(subreddit, limit, category, time_filter)
            .await
            .unwrap_or_empty()
    }

    pub async fn get_subreddit_posts_outcome(
        &self,
        subreddit: &str,
        limit: u32,
        category: Category,
        time_filter: TimeFilter,
    ) -> UnitOutcome<Vec<Post>> {
        if !self.enabled {
            return UnitOutcome::Fetched(Vec::new());
        }

        let result = self
            .scraper
            .fetch_subreddit_posts(subreddit, limit, category, time_filter)
            .await;
        self.delay.wait().await;

        UnitOutcome::from_result(
            WorkUnit::SubredditListing {
                subreddit: subreddit.to_string(),
            },
            result,
        )
    }

    /// Hot posts of the day from one subreddit.
    pub async fn scrape_hot_posts(&self, subreddit: &str, limit: u32) -> Vec<Post> {
        info!("Fetching hot posts from r/{}...", subreddit);
        let posts = self
            .get_subreddit_posts(subreddit, limit, Category::Hot, TimeFilter::Day)
            .await;
        info!("Retrieved {} hot posts", posts.len());
        posts
    }

    /// Posts mentioning `ticker` across `subreddits`, or the configured list
    /// when `None`. Each post is tagged with its source subreddit and the ticker.
    pub async fn search_ticker(
        &self,
        ticker: &str,
        subreddits: Option<&[String]>,
        limit_per_subreddit: u32,
    ) -> Vec<Post> {
        self.search_ticker_outcome(ticker, subreddits, limit_per_subreddit)
            .await
            .into_data()
    }

    pub async fn search_ticker_outcome(
        &self,
        ticker: &str,
        subreddits: Option<&[String]>,
        limit_per_subreddit: u32,
    ) -> Partial<Vec<Post>> {
        let mut found = Partial::new(Vec::new());
        if !self.enabled {
            return found;
        }

        for subreddit in self.resolve_subreddits(subreddits) {
            info!("Searching r/{} for {}...", subreddit, ticker);
            let result = self
                .scraper
                .search_subreddit(subreddit, ticker, limit_per_subreddit, SearchSort::Relevance)
                .await;
            self.delay.wait().await;

            let unit = WorkUnit::SubredditSearch {
                subreddit: subreddit.clone(),
                query: ticker.to_string(),
            };
            match UnitOutcome::from_result(unit, result) {
                UnitOutcome::Fetched(mut posts) => {
                    if posts.is_empty() {
                        info!("No posts found in r/{}", subreddit);
                        continue;
                    }
                    info!("Found {} posts in r/{}", posts.len(), subreddit);
                    for post in posts.iter_mut() {
                        post.tag_subreddit(subreddit);
                        post.tag_ticker(ticker);
                    }
                    found.data.append(&mut posts);
                }
                UnitOutcome::Failed(failure) => found.record_failure(failure),
            }
        }

        found
    }

    /// A post with its comments; `None` when disabled or on failure.
    pub async fn get_post_details(&self, permalink: &str) -> Option<PostDetails> {
        self.get_post_details_outcome(permalink)
            .await
            .into_value()
            .flatten()
    }

    pub async fn get_post_details_outcome(
        &self,
        permalink: &str,
    ) -> UnitOutcome<Option<PostDetails>> {
        if !self.enabled {
            return UnitOutcome::Fetched(None);
        }

        info!("Fetching detailed post data for {}", permalink);
        let result = self.scraper.scrape_post_details(permalink).await;
        self.delay.wait().await;

        let outcome = UnitOutcome::from_result(
            WorkUnit::PostDetails {
                permalink: permalink.to_string(),
            },
            result,
        );
        if let UnitOutcome::Fetched(Some(details)) = &outcome {
            info!("Retrieved post with {} comments", details.comments.len());
        }
        outcome
    }

    /// Posts from several subreddits, keyed by subreddit. Subreddits that
    /// yield nothing are left out of the map.
    pub async fn get_multi_subreddit_posts(
        &self,
        subreddits: Option<&[String]>,
        limit_per_sub: u32,
        category: Category,
    ) -> SubredditBatch {
        self.get_multi_subreddit_posts_outcome(subreddits, limit_per_sub, category)
            .await
            .into_data()
    }

    pub async fn get_multi_subreddit_posts_outcome(
        &self,
        subreddits: Option<&[String]>,
        limit_per_sub: u32,
        category: Category,
    ) -> Partial<SubredditBatch> {
        let mut batch = Partial::new(SubredditBatch::new());
        if !self.enabled {
            return batch;
        }

        for subreddit in self.resolve_subreddits(subreddits) {
            let outcome = self
                .get_subreddit_posts_outcome(subreddit, limit_per_sub, category, TimeFilter::Day)
                .await;
            match outcome {
                UnitOutcome::Fetched(posts) if !posts.is_empty() => {
                    batch.data.insert(subreddit.clone(), posts);
                }
                UnitOutcome::Fetched(_) => {}
                UnitOutcome::Failed(failure) => batch.record_failure(failure),
            }
        }

        batch
    }
}
