//! Human-readable rendering of check results for the terminal

use crate::checker::{AnnotatedLink, CheckResult};
use std::fmt::Write;

/// Renders a check result as a short multi-line summary
///
/// The preview lists at most `preview_rows` entries of the sitemap.
pub fn render_check_result(result: &CheckResult, preview_rows: usize) -> String {
    let report = match result {
        CheckResult::Success(report) => report,
        CheckResult::Error { message } => return format!("✗ Error: {}\n", message),
    };

    let mut out = String::new();
    let verdict = if report.url_found {
        "✓ Listed in sitemap"
    } else {
        "✗ Not listed in sitemap"
    };

    let _ = writeln!(out, "{}: {}", verdict, report.current_url);
    let _ = writeln!(out, "  Sitemap: {}", report.sitemap_url);
    let _ = writeln!(out, "  URLs in sitemap: {}", report.total_urls);
    let _ = writeln!(
        out,
        "  Last modified: {}",
        display_or_dash(&report.last_modified)
    );

    if let Some(entry) = &report.matched_entry {
        let _ = writeln!(
            out,
            "  Matched entry: {} (lastmod {})",
            entry.location,
            display_or_dash(&entry.last_modified)
        );
    }

    if preview_rows > 0 && !report.preview.is_empty() {
        let shown = preview_rows.min(report.preview.len());
        let _ = writeln!(out, "  Preview:");
        for entry in &report.preview[..shown] {
            let _ = writeln!(
                out,
                "    - {}  {}",
                entry.location,
                display_or_dash(&entry.last_modified)
            );
        }
        if report.total_urls > shown {
            let _ = writeln!(out, "    ... and {} more", report.total_urls - shown);
        }
    }

    out
}

/// Renders annotated page links, one per line
pub fn render_links(links: &[AnnotatedLink]) -> String {
    let listed = links.iter().filter(|link| link.listed).count();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Links: {} total, {} in sitemap, {} not in sitemap",
        links.len(),
        listed,
        links.len() - listed
    );
    for link in links {
        let mark = if link.listed { "✓" } else { "✗" };
        let _ = writeln!(out, "  {} {}", mark, link.url);
    }

    out
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
