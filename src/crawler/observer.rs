//! Crawl observers and cancellation
//!
//! Observers receive progress after each round and every error record as it
//! is merged. They are informational only: the traversal does not depend on
//! them.

use crate::state::LinkRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress snapshot taken after a round completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlProgress {
    pub round: u64,

    /// URLs fetched so far (pages and classification probes)
    pub urls_processed: usize,

    /// Distinct URLs seen so far, fetched or still queued
    pub urls_discovered_total: usize,

    /// Last URL dispatched in the round
    pub current_url: String,
}

/// Receives crawl progress and error notifications
pub trait CrawlObserver: Send + Sync {
    /// Called once after every round
    fn on_round(&self, _progress: &CrawlProgress) {}

    /// Called once per error record
    fn on_error(&self, _record: &LinkRecord) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_round(&self, progress: &CrawlProgress) {
        tracing::debug!(
            "Round {}: {} processed, {} discovered, last {}",
            progress.round,
            progress.urls_processed,
            progress.urls_discovered_total,
            progress.current_url
        );
    }

    fn on_error(&self, record: &LinkRecord) {
        tracing::warn!(
            "{} ({}) on {}: {}",
            record.url,
            record.anchor_text,
            record.source_url,
            record.status
        );
    }
}

/// Cancellation flag checked at round boundaries
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
