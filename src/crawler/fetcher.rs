//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests with transparent redirect following
//! - Error classification into success / HTTP error / network error / fetch error
//! - An optional retry policy around each fetch

use crate::config::{Config, RetryConfig};
use crate::state::StatusOutcome;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;

/// Result of a fetch operation
///
/// Every fetch ends in exactly one of these; transport failures are values,
/// not errors.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Response with a status in 200..=299
    Success {
        /// HTTP status code
        status_code: u16,
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value, if any
        content_type: Option<String>,
        /// Page body; only read when requested and the content looks like HTML
        body: Option<String>,
    },

    /// Response with a status outside 200..=299
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Final URL after redirects
        final_url: String,
    },

    /// DNS failure, refused connection, timeout
    NetworkError {
        /// Error description
        error: String,
    },

    /// Anything else: redirect limit hit, unreadable body, unusable URL
    FetchError {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Converts the outcome into the status recorded for a link
    pub fn status(&self) -> StatusOutcome {
        match self {
            Self::Success { status_code, .. } => StatusOutcome::Success(*status_code),
            Self::HttpError { status_code, .. } => StatusOutcome::HttpError(*status_code),
            Self::NetworkError { error } => StatusOutcome::NetworkError(error.clone()),
            Self::FetchError { error } => StatusOutcome::FetchError(error.clone()),
        }
    }

    /// Final URL after redirects, when a response was received
    pub fn final_url(&self) -> Option<&str> {
        match self {
            Self::Success { final_url, .. } | Self::HttpError { final_url, .. } => Some(final_url),
            Self::NetworkError { .. } | Self::FetchError { .. } => None,
        }
    }
}

/// Options for building the HTTP client
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl FetchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.header_value(),
            timeout: Duration::from_secs(config.crawler.request_timeout),
            connect_timeout: Duration::from_secs(config.crawler.connect_timeout),
            follow_redirects: config.crawler.follow_redirects,
            max_redirects: config.crawler.max_redirects as usize,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// With redirects disabled, a 3xx response is reported as an HTTP error.
///
/// # Example
///
/// ```no_run
/// use sumi_linkcheck::config::Config;
/// use sumi_linkcheck::crawler::{build_http_client, FetchOptions};
///
/// let options = FetchOptions::from_config(&Config::default());
/// let client = build_http_client(&options).unwrap();
/// ```
pub fn build_http_client(options: &FetchOptions) -> Result<Client, reqwest::Error> {
    let redirect = if options.follow_redirects {
        Policy::limited(options.max_redirects)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for Content-Type values worth parsing for links
///
/// A missing header is given the benefit of the doubt.
pub fn is_html_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        }
    }
}

/// Fetches a URL once and classifies the result
///
/// # Error classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 2xx | Success |
/// | Any other HTTP status | HttpError |
/// | Timeout, connect failure, other transport failure | NetworkError |
/// | Redirect limit, body read failure, builder failure | FetchError |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The absolute URL to fetch
/// * `read_body` - Whether to download an HTML body for link extraction
pub async fn fetch_url(client: &Client, url: &str, read_body: bool) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
            final_url,
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = if read_body && is_html_content_type(content_type.as_deref()) {
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                return FetchOutcome::FetchError {
                    error: format!("Failed to read response body: {}", e),
                }
            }
        }
    } else {
        None
    };

    FetchOutcome::Success {
        status_code: status.as_u16(),
        final_url,
        content_type,
        body,
    }
}

fn classify_error(e: &reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        FetchOutcome::NetworkError {
            error: "Request timeout".to_string(),
        }
    } else if e.is_connect() {
        FetchOutcome::NetworkError {
            error: format!("Connection failed: {}", e),
        }
    } else if e.is_redirect() {
        FetchOutcome::FetchError {
            error: format!("Redirect error: {}", e),
        }
    } else if e.is_builder() {
        FetchOutcome::FetchError {
            error: format!("Invalid request: {}", e),
        }
    } else if e.is_request() {
        FetchOutcome::NetworkError {
            error: e.to_string(),
        }
    } else {
        FetchOutcome::FetchError {
            error: e.to_string(),
        }
    }
}

/// Retry policy for transient failures
///
/// Only network errors and 5xx responses are retried. All attempts belong to
/// the same dispatch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    /// Returns true if the outcome is worth another attempt
    pub fn is_retryable(outcome: &FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::NetworkError { .. } => true,
            FetchOutcome::HttpError { status_code, .. } => (500..=599).contains(status_code),
            FetchOutcome::Success { .. } | FetchOutcome::FetchError { .. } => false,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// HTTP client plus retry policy
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds a fetcher from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&FetchOptions::from_config(config))?;
        Ok(Self::new(client, RetryPolicy::from_config(&config.retry)))
    }

    /// Fetches a URL, retrying transient failures per the policy
    pub async fn fetch(&self, url: &str, read_body: bool) -> FetchOutcome {
        let mut attempt = 1;
        loop {
            let outcome = fetch_url(&self.client, url, read_body).await;

            if attempt >= self.retry.max_attempts || !RetryPolicy::is_retryable(&outcome) {
                return outcome;
            }

            tracing::debug!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.retry.max_attempts,
                url,
                outcome.status(),
                self.retry.delay
            );
            tokio::time::sleep(self.retry.delay).await;
            attempt += 1;
        }
    }
}
