use async_trait::async_trait;
use sentiment_core::{Category, CoreError, Post, PostDetails, SearchSort, TimeFilter};

/// The three primitives the sentiment layer needs from a Reddit scraper.
///
/// Implementations own everything about talking to Reddit. Callers treat any
/// `Err` as "no results" for that call.
#[async_trait]
pub trait ScraperCapability: Send + Sync {
    /// Posts listed under a subreddit category.
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        limit: u32,
        category: Category,
        time_filter: TimeFilter,
    ) -> Result<Vec<Post>, CoreError>;

    /// Posts in a subreddit matching a search query.
    async fn search_subreddit(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
        sort: SearchSort,
    ) -> Result<Vec<Post>, CoreError>;

    /// A post with its comments, or `None` when the post has nothing to return.
    async fn scrape_post_details(&self, permalink: &str) -> Result<Option<PostDetails>, CoreError>;
}
