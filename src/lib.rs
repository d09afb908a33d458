//! Sumi-Linkcheck: a bounded, depth-limited link checker
//!
//! This crate crawls a single site breadth-first from a seed URL, fetching
//! every in-scope link exactly once and classifying it as a success or an
//! error. Presentation (tables, reports, progress) only observes the crawl and
//! consumes its final [`CrawlResult`].

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Linkcheck operations
///
/// Per-link failures never surface here; they are recorded as error
/// [`LinkRecord`]s. Only invalid arguments and setup failures are fatal.
#[derive(Debug, Error)]
pub enum LinkcheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Linkcheck operations
pub type Result<T> = std::result::Result<T, LinkcheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CancelFlag, Coordinator, CrawlObserver, CrawlProgress};
pub use state::{CrawlResult, CrawlSummary, LinkRecord, StatusOutcome, UrlState};
pub use url::{Scope, ScopeMode};
