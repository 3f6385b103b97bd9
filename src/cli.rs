use clap::{Parser, Subcommand};
use sentiment_core::{Category, TimeFilter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Scrape Reddit for stock ticker mentions and save them as JSON for sentiment analysis"
)]
pub struct Cli {
    /// TOML or JSON config file (`social_sentiment` table plus optional `stock_watchlist`)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Proxy URL, overrides the config file and REDDIT_PROXY
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search every configured subreddit for each ticker and save a summary
    Sentiment {
        /// Tickers to search for; defaults to the config watchlist
        #[arg(short, long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Maximum posts per ticker per subreddit
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Search the stock-focused subreddit preset instead of the configured list
        #[arg(long)]
        stock_subreddits: bool,

        #[arg(short, long, default_value = "stock_sentiment_data.json")]
        output: PathBuf,
    },

    /// Show the hottest posts from one subreddit
    Hot {
        #[arg(short, long, default_value = "wallstreetbets")]
        subreddit: String,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value = "hot")]
        category: Category,

        #[arg(long, default_value = "day")]
        time_filter: TimeFilter,

        /// Also fetch the comments of the top post
        #[arg(long)]
        details: bool,
    },

    /// Fetch posts from every configured subreddit and save them keyed by subreddit
    Multi {
        #[arg(short, long, default_value_t = 30)]
        limit: u32,

        #[arg(long, default_value = "hot")]
        category: Category,

        #[arg(short, long, default_value = "subreddit_posts.json")]
        output: PathBuf,
    },

    /// Fetch one post with its comments
    Details {
        /// Post permalink, e.g. /r/stocks/comments/abc123/title/
        permalink: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
