//! Terminal table output

use crate::state::{CrawlResult, LinkRecord};
use std::fmt::Write;

const URL_WIDTH: usize = 60;
const STATUS_WIDTH: usize = 10;
const TEXT_WIDTH: usize = 30;

/// Formats a crawl result as fixed-width tables followed by a summary
pub fn format_table(result: &CrawlResult) -> String {
    let mut out = String::new();

    if !result.successes.is_empty() {
        let _ = writeln!(out, "Working links ({})\n", result.successes.len());
        write_rows(&mut out, &result.successes);
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out, "Broken links ({})\n", result.errors.len());
        write_rows(&mut out, &result.errors);

        let _ = writeln!(out, "Details:");
        for record in &result.errors {
            let _ = writeln!(out, "  {} - {}", record.url, record.status);
        }
        out.push('\n');
    }

    let summary = &result.summary;
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "  OK: {}", result.successes.len());
    let _ = writeln!(out, "  Broken: {}", result.errors.len());
    let _ = writeln!(out, "  Total: {}", result.total());
    let _ = writeln!(out, "  Success rate: {:.1}%", result.success_rate());
    let _ = writeln!(
        out,
        "  Rounds: {} ({} pages expanded, {:.2}s)",
        summary.rounds,
        summary.pages_expanded,
        summary.duration_seconds()
    );
    if summary.cancelled {
        let _ = writeln!(out, "  Crawl was cancelled; results are partial");
    }

    out
}

fn write_rows(out: &mut String, records: &[LinkRecord]) {
    let _ = writeln!(
        out,
        "{:<url$} {:<status$} {:<text$} {}",
        "URL",
        "STATUS",
        "TEXT",
        "FOUND ON",
        url = URL_WIDTH,
        status = STATUS_WIDTH,
        text = TEXT_WIDTH
    );
    let _ = writeln!(out, "{}", "=".repeat(URL_WIDTH + STATUS_WIDTH + TEXT_WIDTH + 12));

    for record in records {
        let _ = writeln!(
            out,
            "{:<url$} {:<status$} {:<text$} {}",
            truncate(&record.url, URL_WIDTH),
            record.status.short_label(),
            truncate(&record.anchor_text, TEXT_WIDTH),
            record.source_url,
            url = URL_WIDTH,
            status = STATUS_WIDTH,
            text = TEXT_WIDTH
        );
    }
    out.push('\n');
}

/// Shortens `text` to `width` characters, ending in "..." when cut
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
