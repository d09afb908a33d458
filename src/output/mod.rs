//! Output module for rendering crawl results
//!
//! This module handles:
//! - Terminal tables, JSON and markdown reports of a finished crawl
//! - Live progress output while the crawl runs
//!
//! Everything here consumes a [`CrawlResult`] or observes the crawl; nothing
//! feeds back into the traversal.

mod markdown;
mod progress;
mod table;
mod traits;

pub use markdown::format_markdown_report;
pub use progress::TerminalProgress;
pub use table::format_table;
pub use traits::{OutputError, OutputResult, ReportFormat};

use crate::state::CrawlResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Renders a crawl result in the requested format
pub fn render(result: &CrawlResult, format: ReportFormat) -> OutputResult<String> {
    let rendered = match format {
        ReportFormat::Table => format_table(result),
        ReportFormat::Json => serde_json::to_string_pretty(result)?,
        ReportFormat::Markdown => format_markdown_report(result),
    };
    Ok(rendered)
}

/// Writes a rendered report to `path`, or to stdout when no path is given
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Rendering or writing failed
pub fn write_report(
    result: &CrawlResult,
    format: ReportFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let report = render(result, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(report.as_bytes())?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(report.as_bytes())?;
            if !report.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
