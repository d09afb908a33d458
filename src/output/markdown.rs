//! Markdown report generation
//!
//! This module generates human-readable markdown reports of crawl results,
//! including run information, statistics, and the broken and working links.

use crate::state::{CrawlResult, LinkRecord};

/// Formats a crawl result as markdown
///
/// # Arguments
///
/// * `result` - The finished crawl
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(result: &CrawlResult) -> String {
    let summary = &result.summary;
    let mut md = String::new();

    // Title
    md.push_str("# Sumi-Linkcheck Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed URL**: {}\n", summary.seed_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.duration_seconds()
    ));
    md.push_str(&format!("- **Max Depth**: {}\n", summary.max_depth));
    md.push_str(&format!(
        "- **Concurrency Limit**: {}\n",
        summary.concurrency_limit
    ));
    let status = if summary.cancelled {
        "cancelled"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Links**: {}\n", result.total()));
    md.push_str(&format!("- **Working**: {}\n", result.successes.len()));
    md.push_str(&format!("- **Broken**: {}\n", result.errors.len()));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        result.success_rate()
    ));
    md.push_str(&format!("- **Rounds**: {}\n", summary.rounds));
    md.push_str(&format!(
        "- **Pages Expanded**: {}\n\n",
        summary.pages_expanded
    ));

    if !result.errors.is_empty() {
        md.push_str("## Broken Links\n\n");
        push_records(&mut md, &result.errors);
    }

    if !result.successes.is_empty() {
        md.push_str("## Working Links\n\n");
        push_records(&mut md, &result.successes);
    }

    md
}

fn push_records(md: &mut String, records: &[LinkRecord]) {
    md.push_str("| URL | Status | Text | Found On |\n");
    md.push_str("|-----|--------|------|----------|\n");

    for record in records {
        md.push_str(&format!(
            "| {} | {} | {} | [{}]({}) |\n",
            escape_cell(&record.url),
            escape_cell(&record.status.to_string()),
            escape_cell(&record.anchor_text),
            escape_cell(&record.source_title),
            record.source_url
        ));
    }
    md.push('\n');
}

/// Keeps a value from breaking the table row
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
