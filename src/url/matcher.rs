use super::normalize::canonicalize;
use crate::sitemap::SitemapEntry;

/// Finds the sitemap entry listing a page
///
/// Both the candidate and every entry location are canonicalized before an
/// exact comparison. When several entries share the candidate's canonical
/// form, the first one in document order is returned.
///
/// # Examples
///
/// ```
/// use sitemap_scout::sitemap::SitemapEntry;
/// use sitemap_scout::url::find_match;
///
/// let entries = vec![SitemapEntry::new("https://example.com/page", "2024-01-01")];
/// let found = find_match("https://example.com/page/?utm=1", &entries);
/// assert_eq!(found.map(|e| e.last_modified.as_str()), Some("2024-01-01"));
/// assert!(find_match("https://example.com/other", &entries).is_none());
/// ```
pub fn find_match<'a>(candidate: &str, entries: &'a [SitemapEntry]) -> Option<&'a SitemapEntry> {
    let target = canonicalize(candidate);
    entries
        .iter()
        .find(|entry| canonicalize(&entry.location) == target)
}
