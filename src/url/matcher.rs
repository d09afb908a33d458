use std::fmt;

/// A host pattern used by the `patterns` scope mode
///
/// `example.com` matches only that host. `*.example.com` matches the base
/// domain itself and any subdomain below it. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPattern {
    Exact(String),
    Wildcard(String),
}

impl DomainPattern {
    /// Parses a pattern string, returning `None` when it is malformed
    ///
    /// A pattern must have non-empty labels made of alphanumerics and hyphens,
    /// and `*` may only appear as a leading `*.`.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim().to_lowercase();
        let (base, wildcard) = match pattern.strip_prefix("*.") {
            Some(base) => (base.to_string(), true),
            None => (pattern, false),
        };

        let valid = !base.is_empty()
            && base.split('.').all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|c| c.is_alphanumeric() || c == '-')
            });

        if !valid {
            return None;
        }

        Some(if wildcard {
            Self::Wildcard(base)
        } else {
            Self::Exact(base)
        })
    }

    /// Returns true if the host matches this pattern
    pub fn matches(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        match self {
            Self::Exact(domain) => host == *domain,
            Self::Wildcard(base) => {
                host == *base
                    || host
                        .strip_suffix(base.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
        }
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(domain) => write!(f, "{}", domain),
            Self::Wildcard(base) => write!(f, "*.{}", base),
        }
    }
}
