use sentiment_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, ScraperError, UnitOutcome, WorkUnit,
};

#[test]
fn test_error_codes() {
    let scraper_error = CoreError::Scraper(ScraperError::RequestTimeout);
    assert_eq!(scraper_error.error_code(), "SCRAPER");

    let config_error = CoreError::Config(ConfigError::FileNotFound {
        path: "sentiment.toml".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let io_error = CoreError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "denied",
    ));
    assert_eq!(io_error.error_code(), "IO");

    assert_eq!(
        ScraperError::RateLimitExceeded { retry_after: 30 }.error_code(),
        "SCRAPER_RATE_LIMIT"
    );
    assert_eq!(
        ScraperError::InitializationFailed {
            reason: "bad proxy".to_string()
        }
        .error_code(),
        "SCRAPER_INIT_FAILED"
    );
}

#[test]
fn test_fatal_errors() {
    let init_failure = CoreError::Scraper(ScraperError::InitializationFailed {
        reason: "invalid proxy URL".to_string(),
    });
    assert!(init_failure.is_fatal());

    let per_request = CoreError::Scraper(ScraperError::ServerError { status_code: 503 });
    assert!(!per_request.is_fatal());

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "subreddits".to_string(),
        value: "\"\"".to_string(),
    });
    assert!(config_error.is_fatal());
}

#[test]
fn test_user_friendly_messages() {
    let forbidden = CoreError::Scraper(ScraperError::Forbidden {
        resource: "/r/stocks/hot.json".to_string(),
    });
    let message = forbidden.user_friendly_message();
    assert!(message.contains("/r/stocks/hot.json"));
    assert!(message.contains("blocking"));

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "request_timeout_secs".to_string(),
        value: "0".to_string(),
    });
    assert!(config_error
        .user_friendly_message()
        .contains("request_timeout_secs"));
}

#[test]
fn test_outcome_from_scraper_failure() {
    let outcome: UnitOutcome<Vec<String>> = UnitOutcome::from_result(
        WorkUnit::SubredditListing {
            subreddit: "wallstreetbets".to_string(),
        },
        Err(ScraperError::SubredditNotFound {
            subreddit: "wallstreetbets".to_string(),
        }
        .into()),
    );

    let failure = outcome.failure().cloned().unwrap();
    assert_eq!(failure.error_code, "SCRAPER_SUBREDDIT_NOT_FOUND");
    assert!(failure.reason.contains("wallstreetbets"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new();
    let error = CoreError::Config(ConfigError::FileNotFound {
        path: "missing.toml".to_string(),
    });

    // logging only; must not panic
    reporter.report_error(&error);
}
