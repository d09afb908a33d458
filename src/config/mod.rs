//! Configuration module for Sumi-Linkcheck
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to defaults and
//! command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use sumi_linkcheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkcheck.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, RetryConfig, ScopeConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, MAX_CONCURRENCY};
