use clap::Parser;
use reddit_scraper::{save_results, RedditSentimentClient, RedditJsonScraper};
use sentiment_core::{
    AppConfig, CoreError, ErrorReporter, MultiTickerSummary, Post, PostDetails, SubredditBatch,
    STOCK_SUBREDDITS,
};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

const DEFAULT_LOG_FILTER: &str = "ticker_sentiment=info,reddit_scraper=info,sentiment_core=info";

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    tracing::info!("Starting ticker sentiment scraper");

    let reporter = ErrorReporter::new();
    let mut config = AppConfig::load(cli.config.as_deref()).map_err(|e| {
        reporter.report_error(&e);
        e
    })?;
    config.social_sentiment.override_proxy(cli.proxy.clone());
    if let Command::Sentiment {
        stock_subreddits: true,
        ..
    } = &cli.command
    {
        config.social_sentiment.subreddits = STOCK_SUBREDDITS.iter().map(|s| s.to_string()).collect();
    }

    let reddit = RedditSentimentClient::from_config(&config.social_sentiment).map_err(|e| {
        reporter.report_error(&e);
        e
    })?;

    match cli.command {
        Command::Sentiment {
            tickers,
            limit,
            output,
            ..
        } => {
            let tickers = if tickers.is_empty() {
                config.watchlist()
            } else {
                tickers
            };
            tracing::info!("Scraping tickers: {}", tickers.join(", "));

            let summary = reddit.scrape_multiple_tickers(&tickers, limit).await;
            print_ticker_summary(&summary);
            save_results(&summary, &output).await;
        }
        Command::Hot {
            subreddit,
            limit,
            category,
            time_filter,
            details,
        } => {
            let posts = reddit
                .get_subreddit_posts(&subreddit, limit, category, time_filter)
                .await;
            print_top_posts(&subreddit, &posts);

            if details {
                if let Some(first) = posts.first() {
                    if let Some(post) = reddit.get_post_details(&first.permalink).await {
                        print_post_details(&post);
                    }
                }
            }
        }
        Command::Multi {
            limit,
            category,
            output,
        } => {
            let batch = reddit.get_multi_subreddit_posts(None, limit, category).await;
            print_batch(&batch);
            save_results(&batch, &output).await;
        }
        Command::Details { permalink, output } => {
            match reddit.get_post_details(&permalink).await {
                Some(post) => {
                    print_post_details(&post);
                    if let Some(output) = output {
                        save_results(&post, &output).await;
                    }
                }
                None => println!("No details available for {}", permalink),
            }
        }
    }

    log_pacing(&reddit);
    Ok(())
}

fn log_pacing(reddit: &RedditSentimentClient<RedditJsonScraper>) {
    tracing::info!(
        "Done: {} paced requests (min delay {:?})",
        reddit.delay_controller().waits_issued(),
        reddit.delay_controller().min_delay()
    );
}

fn print_ticker_summary(summary: &MultiTickerSummary) {
    println!("\n{}", "=".repeat(60));
    println!("RESULTS SUMMARY");
    println!("{}", "=".repeat(60));
    for (ticker, report) in &summary.tickers {
        println!("\n{}:", ticker);
        println!("  Total posts found: {}", report.total_mentions());
        println!("  By subreddit:");
        for (subreddit, count) in report.by_subreddit() {
            println!("    - r/{}: {} posts", subreddit, count);
        }
        for failure in report.failures() {
            println!("    ✗ {} ({})", failure.unit, failure.error_code);
        }
    }
}

fn print_top_posts(subreddit: &str, posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts retrieved from r/{}", subreddit);
        return;
    }

    println!("\nTop {} posts from r/{}:", posts.len().min(5), subreddit);
    for (i, post) in posts.iter().take(5).enumerate() {
        println!("\n{}. {}", i + 1, post.title);
        println!("   Score: {} | Comments: {}", post.score, post.num_comments);
        println!("   {}", post.url());
    }
}

fn print_post_details(post: &PostDetails) {
    println!("\nPost: {}", post.title);
    println!("Comments retrieved: {}", post.comments.len());
    if post.comments.is_empty() {
        return;
    }

    println!("\nFirst 3 comments:");
    for (i, comment) in post.comments.iter().take(3).enumerate() {
        println!("{}. [{}]: {}", i + 1, comment.author, preview(&comment.body, 100));
        println!("   Score: {}", comment.score);
    }
}

fn print_batch(batch: &SubredditBatch) {
    println!("Retrieved posts from {} subreddits", batch.len());
    for (subreddit, posts) in batch {
        println!("  r/{}: {} posts", subreddit, posts.len());
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 100), "short");
        let long = "é".repeat(150);
        let shown = preview(&long, 100);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 103);
    }

    #[test]
    fn test_cli_parses_tickers() {
        let cli = Cli::parse_from([
            "ticker-sentiment",
            "--config",
            "sentiment.json",
            "sentiment",
            "--tickers",
            "TSLA,NVDA",
            "--limit",
            "5",
        ]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("sentiment.json"))
        );
        match cli.command {
            Command::Sentiment { tickers, limit, .. } => {
                assert_eq!(tickers, vec!["TSLA", "NVDA"]);
                assert_eq!(limit, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_hot_options() {
        let cli = Cli::parse_from([
            "ticker-sentiment",
            "hot",
            "--subreddit",
            "stocks",
            "--category",
            "top",
            "--time-filter",
            "week",
        ]);

        match cli.command {
            Command::Hot {
                subreddit,
                category,
                time_filter,
                limit,
                details,
            } => {
                assert_eq!(subreddit, "stocks");
                assert_eq!(category, sentiment_core::Category::Top);
                assert_eq!(time_filter, sentiment_core::TimeFilter::Week);
                assert_eq!(limit, 10);
                assert!(!details);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
