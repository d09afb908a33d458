//! Per-URL dispatch state during a single crawl
//!
//! A URL moves `Unseen -> Dispatched -> Resolved` and never goes back.
use std::fmt;

/// Represents where a URL is in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// Not claimed yet; may sit in the frontier any number of times
    Unseen,

    /// Claimed by the scheduler for fetching; never dispatched again
    Dispatched,

    /// Fetch returned (success or any error kind)
    Resolved,
}

impl UrlState {
    /// Returns true if the transition is allowed
    ///
    /// Only forward single steps are valid.
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Dispatched) | (Self::Dispatched, Self::Resolved)
        )
    }

    /// Returns true once the URL has been claimed for fetching
    pub fn is_claimed(&self) -> bool {
        !matches!(self, Self::Unseen)
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unseen => "unseen",
            Self::Dispatched => "dispatched",
            Self::Resolved => "resolved",
        };
        write!(f, "{}", name)
    }
}
