//! Result aggregation
//!
//! Collects one [`LinkRecord`] per resolved link into the success and error
//! partitions. The first record for a URL wins; later ones are ignored.

use crate::state::{CrawlResult, CrawlSummary, LinkRecord};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Aggregator {
    successes: Vec<LinkRecord>,
    errors: Vec<LinkRecord>,
    recorded: HashSet<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolved link
    ///
    /// Returns the stored record, or `None` when the URL was already recorded,
    /// in which case the result set is left untouched.
    pub fn record(&mut self, record: LinkRecord) -> Option<&LinkRecord> {
        if !self.recorded.insert(record.url.clone()) {
            tracing::trace!("Ignoring duplicate record for {}", record.url);
            return None;
        }

        let partition = if record.status.is_success() {
            &mut self.successes
        } else {
            &mut self.errors
        };
        partition.push(record);
        partition.last()
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Consumes the aggregator into the final result
    pub fn into_result(self, summary: CrawlSummary) -> CrawlResult {
        CrawlResult {
            successes: self.successes,
            errors: self.errors,
            summary,
        }
    }
}
