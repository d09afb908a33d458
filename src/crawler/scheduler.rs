//! Scheduler for managing the crawl frontier and the concurrency gate
//!
//! This module handles:
//! - Breadth-first round selection from the frontier
//! - The at-most-once dispatch claim
//! - Global concurrency limiting via a semaphore
//! - Feeding discovered links back into the frontier

use crate::crawler::frontier::{Frontier, FrontierEntry, LinkOrigin, VisitedSet};
use crate::crawler::parser::CandidateLink;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// An entry claimed for fetching in the current round
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub entry: FrontierEntry,

    /// Whether the fetched page gets its links extracted
    pub expand: bool,
}

/// Scheduler owns the per-crawl traversal state
///
/// The frontier and visited set are only touched from the coordinating task,
/// between rounds. Entries are claimed in [`Scheduler::next_round`] before any
/// fetch of that round starts, which is what keeps dispatch at-most-once.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    gate: Arc<Semaphore>,

    frontier: Frontier,
    visited: VisitedSet,

    /// Every distinct URL ever queued, including the seed
    discovered: HashSet<String>,

    concurrency_limit: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// `concurrency_limit` is clamped to at least one.
    pub fn new(max_depth: u32, concurrency_limit: usize) -> Self {
        let concurrency_limit = concurrency_limit.max(1);
        Self {
            gate: Arc::new(Semaphore::new(concurrency_limit)),
            frontier: Frontier::new(max_depth),
            visited: VisitedSet::new(),
            discovered: HashSet::new(),
            concurrency_limit,
        }
    }

    /// Queues the seed at depth 0
    pub fn seed(&mut self, seed_url: &str) {
        self.discovered.insert(seed_url.to_string());
        self.frontier.push(FrontierEntry {
            url: seed_url.to_string(),
            depth: 0,
            origin: LinkOrigin::seed(seed_url),
        });
    }

    /// Claims the next round of entries
    ///
    /// Pops entries in FIFO order, discards ones that were already claimed,
    /// and stops once `concurrency_limit` entries are claimed or the frontier
    /// runs dry. An empty round means the frontier is exhausted.
    pub fn next_round(&mut self) -> Vec<Dispatch> {
        let mut round = Vec::with_capacity(self.concurrency_limit);

        while round.len() < self.concurrency_limit {
            let Some(entry) = self.frontier.pop() else {
                break;
            };

            if !self.visited.claim(&entry.url) {
                tracing::trace!("Skipping {}: already dispatched", entry.url);
                continue;
            }

            let expand = self.frontier.is_expandable(entry.depth);
            round.push(Dispatch { entry, expand });
        }

        round
    }

    /// Queues links found on a page at `page_depth`
    ///
    /// Links already claimed are skipped; the rest are queued at
    /// `page_depth + 1`. Returns how many entries were queued.
    pub fn enqueue_links(
        &mut self,
        page_url: &str,
        page_title: &str,
        page_depth: u32,
        links: &[CandidateLink],
    ) -> usize {
        let mut queued = 0;

        for link in links {
            if self.visited.contains(&link.url) {
                continue;
            }

            let entry = FrontierEntry {
                url: link.url.clone(),
                depth: page_depth + 1,
                origin: LinkOrigin {
                    source_url: page_url.to_string(),
                    source_title: page_title.to_string(),
                    anchor_text: link.anchor_text.clone(),
                },
            };

            if self.frontier.push(entry) {
                self.discovered.insert(link.url.clone());
                queued += 1;
            }
        }

        queued
    }

    /// Records that a dispatched URL's fetch has returned
    pub fn mark_resolved(&mut self, url: &str) {
        if !self.visited.resolve(url) {
            tracing::warn!("Resolved {} without a matching dispatch", url);
        }
    }

    /// Shared concurrency gate for fetches
    pub fn gate(&self) -> Arc<Semaphore> {
        Arc::clone(&self.gate)
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Returns the number of entries waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Number of URLs claimed so far
    pub fn urls_dispatched(&self) -> usize {
        self.visited.len()
    }

    /// Number of distinct URLs seen so far
    pub fn urls_discovered(&self) -> usize {
        self.discovered.len()
    }
}
