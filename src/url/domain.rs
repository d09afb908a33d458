use url::{Host, Url};

/// Second-level labels that sit under a two-letter country code and are not
/// registrable on their own (`example.co.uk`, `example.com.au`, ...).
const COUNTRY_SECOND_LEVELS: &[&str] = &["ac", "co", "com", "edu", "gov", "ltd", "net", "or", "org"];

/// Extracts the lowercase host of a URL
///
/// IPv6 hosts are returned in their bracketed form. Returns `None` for URLs
/// without a host (`data:`, `mailto:`, ...).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_linkcheck::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the registrable domain of a host name
///
/// Keeps the last two labels, or the last three when the second-to-last label
/// is a generic second level under a two-letter country code. IP addresses,
/// single-label hosts (`localhost`) and anything shorter than that are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use sumi_linkcheck::url::registrable_domain;
///
/// assert_eq!(registrable_domain("blog.example.com"), "example.com");
/// assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
/// assert_eq!(registrable_domain("localhost"), "localhost");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();

    if host.parse::<std::net::IpAddr>().is_ok() {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && COUNTRY_SECOND_LEVELS.contains(&second) {
        3
    } else {
        2
    };

    labels[labels.len().saturating_sub(keep)..].join(".")
}

/// Returns the registrable domain of a URL's host
///
/// IP hosts compare as themselves.
pub fn url_registrable_domain(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) => Some(registrable_domain(domain)),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}
