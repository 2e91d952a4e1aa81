//! Sitemap module: locating, fetching, caching and parsing sitemaps
//!
//! This module contains the network and parsing half of a sitemap check:
//! - Probing conventional sitemap paths on a host
//! - Downloading sitemap text under a size ceiling and timeout
//! - Caching raw sitemap text for a bounded time-to-live
//! - Parsing sitemap text into entries, tolerating malformed XML

mod cache;
mod fetcher;
mod locator;
mod parser;

pub use cache::{CacheRecord, SitemapCache};
pub(crate) use fetcher::classify_error;
pub use fetcher::{
    build_http_client, check_declared_size, read_limited_body, BodyLimits, SitemapFetcher,
};
pub use locator::SitemapLocator;
pub use parser::parse_sitemap;

use crate::ScoutError;

/// A single `<url>` entry of a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Content of `<loc>`, trimmed
    pub location: String,

    /// Content of `<lastmod>`, trimmed; empty when absent
    pub last_modified: String,
}

impl SitemapEntry {
    /// Creates a new entry
    pub fn new(location: impl Into<String>, last_modified: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            last_modified: last_modified.into(),
        }
    }
}

/// A successfully parsed sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSitemap {
    /// Entries in document order
    pub entries: Vec<SitemapEntry>,

    /// Number of entries
    pub count: usize,

    /// The first entry's `lastmod`, not a sitemap-wide timestamp
    pub last_modified: String,
}

impl ParsedSitemap {
    /// Builds the parsed form from a non-empty list of entries
    pub fn from_entries(entries: Vec<SitemapEntry>) -> Self {
        let last_modified = entries
            .first()
            .map(|entry| entry.last_modified.clone())
            .unwrap_or_default();

        Self {
            count: entries.len(),
            last_modified,
            entries,
        }
    }
}

/// Result of fetching and parsing a sitemap
pub type SitemapFetchResult = Result<ParsedSitemap, ScoutError>;
