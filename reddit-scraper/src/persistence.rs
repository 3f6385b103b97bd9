//! JSON snapshots of scrape results.

use sentiment_core::{CoreError, ErrorExt};
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serializes `data` as 2-space indented JSON and writes it to `path`.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).await?;
    Ok(())
}

/// Best-effort save: failures are logged and reported as `false`, never raised.
pub async fn save_results<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match write_json(path, data).await {
        Ok(()) => {
            info!("Results saved to: {}", path.display());
            true
        }
        Err(e) => {
            error!(
                code = %e.error_code(),
                "Error saving results to {}: {}",
                path.display(),
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_core::{Post, SubredditBatch, TickerReport};

    #[tokio::test]
    async fn test_save_results_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_sentiment_data.json");

        let mut post = Post::new("TSLA earnings", "/r/stocks/comments/1/tsla/");
        post.tag_subreddit("stocks");
        post.tag_ticker("TSLA");
        let report = TickerReport::from_posts("TSLA", vec![post]);

        assert!(save_results(&report, &path).await);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"ticker\": \"TSLA\""));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["total_mentions"], 1);
        assert_eq!(parsed["by_subreddit"]["stocks"], 1);
        assert_eq!(parsed["posts"][0]["ticker_searched"], "TSLA");
    }

    #[tokio::test]
    async fn test_save_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");

        let mut batch = SubredditBatch::new();
        batch.insert(
            "wallstreetbets".to_string(),
            vec![Post::new("GME", "/r/wallstreetbets/comments/2/gme/")],
        );

        assert!(save_results(&batch, &path).await);
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["wallstreetbets"][0]["title"], "GME");
    }

    #[tokio::test]
    async fn test_save_to_invalid_path_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dir").join("out.json");

        let saved = save_results(&SubredditBatch::new(), &path).await;
        assert!(!saved);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_write_json_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_json(dir.path(), &SubredditBatch::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
