//! Sitemap fragment export
//!
//! Non-indexed pages are exported as `<url>` blocks ready to paste into a
//! `<urlset>`:
//!
//! ```text
//!   <url>
//!     <loc>https://example.com/page</loc>
//!     <lastmod>2024-03-01T00:00:00+00:00</lastmod>
//!   </url>
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::escape::escape;

/// Timestamp layout for `<lastmod>`: UTC, whole seconds, explicit offset
const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Picks the `<lastmod>` value for an export
///
/// Accepts RFC 3339 timestamps (converted to UTC), `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD HH:MM:SS` (taken as UTC) and plain `YYYY-MM-DD` dates (midnight
/// UTC). Anything else, including no override, falls back to `now`.
pub fn resolve_lastmod(lastmod_override: Option<&str>, now: DateTime<Utc>) -> String {
    lastmod_override
        .and_then(parse_date)
        .unwrap_or(now)
        .format(LASTMOD_FORMAT)
        .to_string()
}

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Renders one `<url>` block per URL, all sharing `lastmod`
pub fn render_url_entries<'a>(urls: impl IntoIterator<Item = &'a str>, lastmod: &str) -> String {
    urls.into_iter()
        .map(|url| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>",
                escape(url),
                lastmod
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
