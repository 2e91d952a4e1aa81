//! Sitemap check orchestration
//!
//! This module composes the pieces of a check:
//! - Locating the sitemap of the page's host
//! - Fetching it through the cache, with a page-context retry on failure
//! - Matching the page against the parsed entries
//! - Extracting and annotating the links of a page
//!
//! [`Checker::check`] holds no state of its own beyond the shared cache;
//! session tracking and counter updates happen around it, in the agent.

mod links;
mod orchestrator;
mod page_context;

pub use links::{annotate_links, extract_links, AnnotatedLink};
pub use orchestrator::Checker;
pub use page_context::PageContext;

use crate::sitemap::SitemapEntry;

/// Successful outcome of a sitemap check
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapReport {
    /// The page URL that was checked, as given
    pub current_url: String,

    /// The sitemap the page was checked against
    pub sitemap_url: String,

    /// Whether the page is listed
    pub url_found: bool,

    /// The entry listing the page, if any
    pub matched_entry: Option<SitemapEntry>,

    /// Number of entries in the sitemap
    pub total_urls: usize,

    /// `lastmod` of the sitemap's first entry
    pub last_modified: String,

    /// The first entries of the sitemap, in document order
    pub preview: Vec<SitemapEntry>,
}

/// Outcome of a sitemap check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// The sitemap was found and parsed
    Success(SitemapReport),

    /// Anything went wrong; the message is meant for the user
    Error { message: String },
}

impl CheckResult {
    /// Returns true for the error variant
    pub fn has_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The report, for successful checks
    pub fn report(&self) -> Option<&SitemapReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Error { .. } => None,
        }
    }

    /// The error message, for failed checks
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error { message } => Some(message),
        }
    }

    /// Whether the page was found; false for errors
    pub fn url_found(&self) -> bool {
        self.report().is_some_and(|report| report.url_found)
    }
}
