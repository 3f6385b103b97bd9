//! Ticker sweeps: one search per configured subreddit, folded into a
//! [`TickerReport`] per ticker.

use crate::capability::ScraperCapability;
use crate::client::RedditSentimentClient;
use sentiment_core::{MultiTickerSummary, SentimentData, TickerReport};
use tracing::info;

impl<S: ScraperCapability> RedditSentimentClient<S> {
    /// Searches every configured subreddit for `ticker` and builds its report.
    /// Failed subreddits are recorded on the report; they never make it fail.
    pub async fn ticker_report(&self, ticker: &str, limit_per_subreddit: u32) -> TickerReport {
        let found = self
            .search_ticker_outcome(ticker, None, limit_per_subreddit)
            .await;
        let report = TickerReport::with_failures(ticker, found.data, found.failures);

        info!(
            ticker = %ticker,
            mentions = report.total_mentions(),
            failed_units = report.failures().len(),
            "Built ticker report"
        );
        report
    }

    /// Reports for each ticker. Empty when the client is disabled.
    pub async fn get_sentiment_data(
        &self,
        tickers: &[String],
        limit_per_ticker: u32,
    ) -> SentimentData {
        let mut results = SentimentData::new();
        if !self.is_enabled() {
            return results;
        }

        for ticker in tickers {
            let report = self.ticker_report(ticker, limit_per_ticker).await;
            results.insert(ticker.clone(), report);
        }
        results
    }

    /// Like [`get_sentiment_data`](Self::get_sentiment_data), wrapped in a
    /// timestamped summary, with a longer pause between tickers.
    pub async fn scrape_multiple_tickers(
        &self,
        tickers: &[String],
        max_posts_per_ticker: u32,
    ) -> MultiTickerSummary {
        let mut results = SentimentData::new();
        if !self.is_enabled() {
            return MultiTickerSummary::new(results);
        }

        for (i, ticker) in tickers.iter().enumerate() {
            info!("Scraping sentiment for: {}", ticker);
            let report = self.ticker_report(ticker, max_posts_per_ticker).await;
            results.insert(ticker.clone(), report);

            if i + 1 < tickers.len() {
                self.delay_controller().wait_between_batches().await;
            }
        }

        MultiTickerSummary::new(results)
    }
}
