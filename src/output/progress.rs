//! Live terminal progress
//!
//! Prints one line per round and one per broken link to stderr, so stdout
//! stays clean for the report.

use crate::crawler::{CrawlObserver, CrawlProgress};
use crate::state::LinkRecord;

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalProgress;

impl CrawlObserver for TerminalProgress {
    fn on_round(&self, progress: &CrawlProgress) {
        eprintln!(
            "[round {}] {} checked, {} discovered ({})",
            progress.round,
            progress.urls_processed,
            progress.urls_discovered_total,
            progress.current_url
        );
    }

    fn on_error(&self, record: &LinkRecord) {
        eprintln!(
            "  broken: {} [{}] on {}",
            record.url,
            record.status.short_label(),
            record.source_url
        );
    }
}
