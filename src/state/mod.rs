//! State module for tracking crawl progress and results
//!
//! # Components
//!
//! - `UrlState`: dispatch state of a single URL (unseen, dispatched, resolved)
//! - `StatusOutcome`: typed classification of a fetched link
//! - `LinkRecord` / `CrawlResult`: the values a crawl returns

mod record;
mod url_state;

// Re-export main types
pub use record::{describe_status, CrawlResult, CrawlSummary, LinkRecord, StatusOutcome};
pub use url_state::UrlState;
