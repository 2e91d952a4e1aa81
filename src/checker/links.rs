//! Page link extraction and sitemap annotation
//!
//! Backs link highlighting: every link on a page is marked as listed or not
//! listed in the site's sitemap.

use crate::url::canonicalize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A page link and whether the sitemap lists it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLink {
    /// Absolute link target
    pub url: String,

    /// Whether the link's canonical form is in the sitemap
    pub listed: bool,
}

/// Extracts the absolute targets of `<a href>` links on a page
///
/// # Link Extraction Rules
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Targets that are not HTTP(S) after resolution
///
/// Duplicates are dropped; the first occurrence keeps its position.
///
/// # Example
///
/// ```
/// use sitemap_scout::checker::extract_links;
/// use url::Url;
///
/// let html = r##"<body><a href="/a">A</a><a href="#top">Top</a></body>"##;
/// let base = Url::parse("https://example.com/page").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/a".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                if seen.insert(absolute_url.clone()) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Marks each link as listed when its canonical form is in `sitemap_urls`
///
/// `sitemap_urls` is expected in canonical form, as returned by
/// [`crate::Checker::sitemap_urls`].
pub fn annotate_links(links: &[String], sitemap_urls: &[String]) -> Vec<AnnotatedLink> {
    let listed: HashSet<&str> = sitemap_urls.iter().map(String::as_str).collect();

    links
        .iter()
        .map(|link| AnnotatedLink {
            url: link.clone(),
            listed: listed.contains(canonicalize(link).as_str()),
        })
        .collect()
}

/// Resolves a link href to an absolute URL, or None if it should be skipped
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
