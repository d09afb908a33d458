use crate::output::ReportFormat;
use crate::url::ScopeMode;
use serde::Deserialize;

/// Main configuration structure for Sumi-Linkcheck
///
/// Every section is optional in the TOML file and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub retry: RetryConfig,
    pub scope: ScopeConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Deepest page that still gets its links extracted (seed = 0)
    pub max_depth: u32,

    /// Maximum number of fetches in flight at once
    pub max_concurrency: u32,

    /// Whole-request timeout (seconds)
    pub request_timeout: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout: u64,

    pub follow_redirects: bool,

    /// Redirect hops allowed before the fetch counts as failed
    pub max_redirects: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_concurrency: 5,
            request_timeout: 10,
            connect_timeout: 5,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    pub crawler_name: String,
    pub crawler_version: String,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiLinkcheck".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `CrawlerName/Version (+ContactURL; ContactEmail)`, with the contact
    /// block trimmed to whatever is configured.
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Retry policy applied around each fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Total attempts per dispatch, including the first one
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds)
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay_ms: 1000,
        }
    }
}

/// Which discovered links belong to the crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub mode: ScopeMode,

    /// Host patterns for `patterns` mode (`example.com`, `*.example.com`)
    pub patterns: Vec<String>,
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,

    /// Report file; stdout when unset
    pub path: Option<String>,
}
