pub mod aggregator;
pub mod api;
pub mod capability;
pub mod client;
pub mod delay;
pub mod persistence;


pub use api::{RedditJsonScraper, ScraperSettings};
pub use capability::ScraperCapability;
pub use client::{
    RedditSentimentClient, DEFAULT_MULTI_LIMIT, DEFAULT_POST_LIMIT, DEFAULT_SEARCH_LIMIT,
};
pub use delay::{min_delay_for_rate, DelayController, FALLBACK_MIN_DELAY};
pub use persistence::{save_results, write_json};
