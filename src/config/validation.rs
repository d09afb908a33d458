use crate::config::types::{Config, CrawlerConfig, RetryConfig, ScopeConfig, UserAgentConfig};
use crate::url::{DomainPattern, ScopeMode};
use crate::ConfigError;
use url::Url;

/// Upper bound for `max-concurrency`
pub const MAX_CONCURRENCY: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_retry_config(&config.retry)?;
    validate_scope_config(&config.scope)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth is unsigned, every value is acceptable

    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrency
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be at least 1 second".to_string(),
        ));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout must be at least 1 second".to_string(),
        ));
    }

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }
    Ok(())
}

fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    for pattern in &config.patterns {
        if DomainPattern::parse(pattern).is_none() {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' is not a valid host pattern",
                pattern
            )));
        }
    }

    if config.mode == ScopeMode::Patterns && config.patterns.is_empty() {
        return Err(ConfigError::Validation(
            "scope mode 'patterns' requires at least one pattern".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation: one `@` with text on both sides
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }
    Ok(())
}
