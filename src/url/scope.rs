//! Crawl scope predicate
//!
//! The scope decides whether a discovered link belongs to the same crawl
//! target as the seed. It never applies to the seed itself.

use crate::url::domain::{extract_domain, url_registrable_domain};
use crate::url::matcher::DomainPattern;
use serde::{Deserialize, Serialize};
use url::Url;

/// How the scope is derived from the seed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Same registrable domain as the seed (`www.example.com` ~ `blog.example.com`)
    #[default]
    RegistrableDomain,
    /// Exactly the seed's host
    Host,
    /// Any host matching one of the configured patterns
    Patterns,
}

/// Scope predicate for discovered links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    RegistrableDomain(String),
    Host(String),
    Patterns(Vec<DomainPattern>),
}

impl Scope {
    /// Builds the scope for a crawl starting at `seed`
    ///
    /// Malformed patterns are ignored here; configuration validation rejects
    /// them before a crawl starts. A seed without a host yields a scope that
    /// matches nothing.
    pub fn for_seed(seed: &Url, mode: ScopeMode, patterns: &[String]) -> Self {
        match mode {
            ScopeMode::RegistrableDomain => {
                Self::RegistrableDomain(url_registrable_domain(seed).unwrap_or_default())
            }
            ScopeMode::Host => Self::Host(extract_domain(seed).unwrap_or_default()),
            ScopeMode::Patterns => Self::Patterns(
                patterns
                    .iter()
                    .filter_map(|p| DomainPattern::parse(p))
                    .collect(),
            ),
        }
    }

    /// Returns true if the URL's authority is inside this scope
    ///
    /// Ports are not compared.
    pub fn contains(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        match self {
            Self::RegistrableDomain(domain) => {
                !domain.is_empty() && url_registrable_domain(url).as_deref() == Some(domain)
            }
            Self::Host(expected) => !expected.is_empty() && host.eq_ignore_ascii_case(expected),
            Self::Patterns(patterns) => patterns.iter().any(|p| p.matches(host)),
        }
    }
}
