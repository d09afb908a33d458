//! Link records and crawl results
//!
//! These are the values the crawl hands to its callers. They are immutable
//! once built and serialize directly into the JSON report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Final classification of a single dispatched URL
///
/// The taxonomy is kept intact all the way to the report: an HTTP error and a
/// network error are never collapsed into a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum StatusOutcome {
    /// 2xx response
    Success(u16),
    /// Any response outside 200..=299
    HttpError(u16),
    /// DNS, connection or timeout failure
    NetworkError(String),
    /// Anything else that went wrong while fetching (bad redirect, unreadable body, ...)
    FetchError(String),
}

impl StatusOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// HTTP status code, when a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success(code) | Self::HttpError(code) => Some(*code),
            Self::NetworkError(_) | Self::FetchError(_) => None,
        }
    }

    /// Short label for tables ("200", "404", "network", "fetch")
    pub fn short_label(&self) -> String {
        match self {
            Self::Success(code) | Self::HttpError(code) => code.to_string(),
            Self::NetworkError(_) => "network".to_string(),
            Self::FetchError(_) => "fetch".to_string(),
        }
    }
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(code) | Self::HttpError(code) => write!(f, "{}", describe_status(*code)),
            Self::NetworkError(message) => write!(f, "Network error: {}", message),
            Self::FetchError(message) => write!(f, "Fetch error: {}", message),
        }
    }
}

/// Returns a plain-language explanation of an HTTP status code
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::state::describe_status;
///
/// assert_eq!(
///     describe_status(404),
///     "404 Not Found - The resource could not be found on the server."
/// );
/// assert_eq!(describe_status(418), "418 - Other error");
/// ```
pub fn describe_status(code: u16) -> String {
    let message = match code {
        200 => "200 OK - The request was successful.",
        301 => "301 Moved Permanently - The resource has been moved permanently to a new location.",
        302 => "302 Found - The resource was found, but at a different location.",
        400 => "400 Bad Request - The server could not understand the request due to invalid syntax.",
        401 => "401 Unauthorized - Access is denied due to invalid credentials.",
        403 => "403 Forbidden - Access is denied, even with valid credentials.",
        404 => "404 Not Found - The resource could not be found on the server.",
        405 => "405 Method Not Allowed - The method specified in the request is not allowed.",
        408 => "408 Request Timeout - The server timed out waiting for the request.",
        429 => "429 Too Many Requests - You have sent too many requests in a given amount of time.",
        500 => "500 Internal Server Error - The server encountered an unexpected condition.",
        502 => "502 Bad Gateway - The server received an invalid response from the upstream server.",
        503 => "503 Service Unavailable - The server is currently unavailable (overloaded or down).",
        504 => "504 Gateway Timeout - The server did not receive a timely response from an upstream server.",
        other => return format!("{} - Other error", other),
    };
    message.to_string()
}

/// Outcome of one link plus the context it was discovered in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub status: StatusOutcome,

    /// Visible anchor text, or the fallback chosen by the extractor
    pub anchor_text: String,

    /// The link as dispatched (before redirects)
    pub url: String,

    /// Page the link was found on
    pub source_url: String,

    /// Title of the page the link was found on
    pub source_title: String,
}

/// Run metadata for a crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub max_depth: u32,
    pub concurrency_limit: usize,
    pub rounds: u64,
    pub urls_dispatched: u64,
    pub pages_expanded: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
}

impl CrawlSummary {
    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Everything a crawl produced
///
/// Each URL appears at most once across both partitions.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub successes: Vec<LinkRecord>,
    pub errors: Vec<LinkRecord>,
    pub summary: CrawlSummary,
}

impl CrawlResult {
    /// Total number of classified links
    pub fn total(&self) -> usize {
        self.successes.len() + self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Percentage of classified links that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.successes.len() as f64 / self.total() as f64 * 100.0
        }
    }

    /// Finds a record by URL in either partition
    pub fn find(&self, url: &str) -> Option<&LinkRecord> {
        self.successes
            .iter()
            .chain(self.errors.iter())
            .find(|record| record.url == url)
    }
}
