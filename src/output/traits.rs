//! Output error and format types
//!
//! This module defines the report formats and the error type shared by the
//! renderers.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Report format for a finished crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Fixed-width terminal tables
    #[default]
    Table,

    /// Pretty-printed JSON of the full result
    Json,

    /// Markdown report
    Markdown,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Markdown => "markdown",
        };
        write!(f, "{}", name)
    }
}
