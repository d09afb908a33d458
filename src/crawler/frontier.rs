//! Crawl frontier and visitation tracking
//!
//! The frontier is a FIFO of `(url, depth)` entries waiting to be dispatched.
//! The visited set records which URLs have been claimed. A URL may be queued
//! several times from different pages; the dedup point is the claim at
//! dispatch, which happens at most once per URL.

use crate::state::UrlState;
use std::collections::{HashMap, VecDeque};

/// Where a queued link was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOrigin {
    pub source_url: String,
    pub source_title: String,
    pub anchor_text: String,
}

impl LinkOrigin {
    /// Placeholder origin for the seed, which nothing links to
    pub fn seed(seed_url: &str) -> Self {
        Self {
            source_url: seed_url.to_string(),
            source_title: "Root Page".to_string(),
            anchor_text: "Root Page".to_string(),
        }
    }
}

/// A URL waiting to be dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,

    /// Hops from the seed (seed = 0)
    pub depth: u32,

    pub origin: LinkOrigin,
}

/// FIFO queue of entries, bounded by depth
///
/// Entries deeper than `max_depth + 1` are refused: pages up to `max_depth`
/// get expanded, and the level right below them is only fetched to classify
/// the links found on the deepest pages.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            max_depth,
        }
    }

    /// Appends an entry, returning false if it was dropped for depth
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if entry.depth > self.max_depth.saturating_add(1) {
            tracing::trace!(
                "Dropping {} at depth {} (max depth {})",
                entry.url,
                entry.depth,
                self.max_depth
            );
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Returns true if an entry at this depth should have its links extracted
    pub fn is_expandable(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// URLs that have been claimed for fetching, and how far they got
#[derive(Debug, Default)]
pub struct VisitedSet {
    states: HashMap<String, UrlState>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a URL
    pub fn state(&self, url: &str) -> UrlState {
        self.states.get(url).copied().unwrap_or(UrlState::Unseen)
    }

    /// Returns true once the URL has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.state(url).is_claimed()
    }

    /// Claims a URL for dispatch
    ///
    /// Returns true exactly once per URL; later claims return false.
    pub fn claim(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.states.insert(url.to_string(), UrlState::Dispatched);
        true
    }

    /// Marks a dispatched URL as resolved
    ///
    /// Returns false if the URL was not in the dispatched state.
    pub fn resolve(&mut self, url: &str) -> bool {
        match self.states.get_mut(url) {
            Some(state) if state.can_transition_to(UrlState::Resolved) => {
                *state = UrlState::Resolved;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
