use crate::error::*;
use tracing::{error, info};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn is_fatal(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        match self {
            CoreError::Scraper(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                e.log_error();
            }
            other => {
                error!(code = %other.error_code(), "{}", other);
            }
        }
        self
    }

    fn is_fatal(&self) -> bool {
        match self {
            CoreError::Scraper(e) => e.is_fatal(),
            CoreError::Config(e) => e.is_fatal(),
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Scraper(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection or proxy."
                    .to_string()
            }
            CoreError::Io(_) => "File system error. Please check the output path.".to_string(),
            CoreError::Serialization(_) => {
                "Data could not be serialized or parsed as JSON.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Scraper(_) => "SCRAPER".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for ScraperError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "scraper error: {:?}", self);
        self
    }

    fn is_fatal(&self) -> bool {
        // Without a collaborator nothing can be scraped.
        matches!(self, ScraperError::InitializationFailed { .. })
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ScraperError::InitializationFailed { reason } => {
                format!("Could not start the Reddit scraper: {}", reason)
            }
            ScraperError::RateLimitExceeded { retry_after } => format!(
                "Reddit is throttling requests. Wait {} seconds or configure a proxy.",
                retry_after
            ),
            ScraperError::Forbidden { resource } => format!(
                "Access denied to {}. Reddit may be blocking this IP address.",
                resource
            ),
            ScraperError::SubredditNotFound { subreddit } => {
                format!("r/{} does not exist or is private.", subreddit)
            }
            ScraperError::PostNotFound { .. } => {
                "That post no longer exists or was removed.".to_string()
            }
            ScraperError::RequestTimeout => "Request to Reddit timed out.".to_string(),
            _ => "Reddit returned an unexpected response. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ScraperError::InitializationFailed { .. } => "SCRAPER_INIT_FAILED".to_string(),
            ScraperError::RateLimitExceeded { .. } => "SCRAPER_RATE_LIMIT".to_string(),
            ScraperError::Forbidden { .. } => "SCRAPER_FORBIDDEN".to_string(),
            ScraperError::SubredditNotFound { .. } => "SCRAPER_SUBREDDIT_NOT_FOUND".to_string(),
            ScraperError::PostNotFound { .. } => "SCRAPER_POST_NOT_FOUND".to_string(),
            ScraperError::RequestTimeout => "SCRAPER_TIMEOUT".to_string(),
            ScraperError::InvalidResponse { .. } => "SCRAPER_INVALID_RESPONSE".to_string(),
            ScraperError::ServerError { .. } => "SCRAPER_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!(code = %self.error_code(), "config error: {}", self);
        self
    }

    fn is_fatal(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidFormat { .. } => {
                "The config file could not be read as TOML or JSON.".to_string()
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Config field '{}' has an unusable value.", field)
            }
            ConfigError::Parse(_) => {
                "Configuration file could not be parsed as TOML.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidFormat { .. } => "CONFIG_INVALID_FORMAT".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs an error together with its code and a user-facing explanation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!(
            code = %error.error_code(),
            fatal = error.is_fatal(),
            "{}",
            error.user_friendly_message()
        );
    }
}
