//! Crawler module for link discovery and classification
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - Frontier, visited set and round scheduling
//! - Result aggregation and crawl observers
//! - Overall crawl coordination

mod aggregator;
mod coordinator;
mod fetcher;
mod frontier;
mod observer;
mod parser;
mod scheduler;

pub use aggregator::Aggregator;
pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, fetch_url, is_html_content_type, FetchOptions, FetchOutcome, HttpFetcher,
    RetryPolicy,
};
pub use frontier::{Frontier, FrontierEntry, LinkOrigin, VisitedSet};
pub use observer::{CancelFlag, CrawlObserver, CrawlProgress, NoopObserver, TracingObserver};
pub use parser::{extract_links, CandidateLink, ParsedPage, NO_TEXT, NO_TITLE};
pub use scheduler::{Dispatch, Scheduler};

use crate::config::Config;
use crate::state::CrawlResult;
use crate::LinkcheckError;

/// Runs a complete crawl with default settings
///
/// This is the main library entry point. Everything except the depth and
/// concurrency limits comes from [`Config::default`]; use [`Coordinator`]
/// directly for anything more specific. Unlike `max-concurrency` in a config
/// file, `concurrency_limit` has no upper bound.
///
/// # Arguments
///
/// * `seed_url` - Absolute http(s) URL to start from
/// * `max_depth` - Deepest level whose pages get expanded (seed = 0)
/// * `concurrency_limit` - Maximum simultaneous fetches, at least 1
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl ran to completion; per-link failures are in `errors`
/// * `Err(LinkcheckError)` - Invalid arguments, nothing was fetched
pub async fn crawl(
    seed_url: &str,
    max_depth: u32,
    concurrency_limit: usize,
) -> Result<CrawlResult, LinkcheckError> {
    if concurrency_limit == 0 {
        return Err(LinkcheckError::InvalidArgument(
            "concurrency limit must be at least 1".to_string(),
        ));
    }

    let mut config = Config::default();
    config.crawler.max_depth = max_depth;

    Coordinator::new(&config)?
        .with_concurrency_limit(concurrency_limit)
        .crawl(seed_url)
        .await
}
