//! URL handling module for Sumi-Linkcheck
//!
//! This module provides domain extraction, registrable-domain derivation,
//! wildcard host patterns and the crawl scope predicate.

mod domain;
mod matcher;
mod scope;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, registrable_domain, url_registrable_domain};
pub use matcher::DomainPattern;
pub use scope::{Scope, ScopeMode};

/// Parses and checks a seed URL
///
/// The seed must be an absolute `http` or `https` URL with a host.
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::parse_seed;
///
/// assert!(parse_seed("https://example.com/").is_ok());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("not a url").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
