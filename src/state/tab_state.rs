//! Session state of a single browsing tab
//!
//! Tabs move through these states as checks complete:
//!
//! ```text
//! (no record) --check--> CheckedFound <--check--> CheckedNotFound
//!      ^                      |                         |
//!      +------- tab closed ---+-------------------------+
//! ```
//!
//! A failed check leaves the state where it was.

use crate::checker::CheckResult;
use crate::url::canonicalize;
use std::collections::BTreeSet;

/// Outcome of the most recent successful check of a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabStatus {
    /// The checked page was listed in its sitemap
    CheckedFound,

    /// The checked page was missing from its sitemap
    CheckedNotFound,
}

/// State kept for one tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSessionState {
    /// URL of the last check started for this tab, as given
    pub last_checked_url: Option<String>,

    /// Outcome of the last successful check
    pub last_status: Option<TabStatus>,

    /// Canonical URLs found missing from their sitemap
    pub non_indexed_urls: BTreeSet<String>,
}

impl TabSessionState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a check outcome to the non-indexed set
    ///
    /// A page found in its sitemap leaves the set; a page missing from it
    /// joins the set. Errors change nothing.
    pub fn apply(&mut self, result: &CheckResult) {
        let Some(report) = result.report() else {
            return;
        };

        let canonical = canonicalize(&report.current_url);
        if report.url_found {
            self.non_indexed_urls.remove(&canonical);
            self.last_status = Some(TabStatus::CheckedFound);
        } else {
            self.non_indexed_urls.insert(canonical);
            self.last_status = Some(TabStatus::CheckedNotFound);
        }
    }

    /// Removes a page from the non-indexed set; returns true if it was there
    pub fn remove(&mut self, url: &str) -> bool {
        self.non_indexed_urls.remove(&canonicalize(url))
    }

    /// Returns true if a page is currently marked non-indexed
    pub fn is_non_indexed(&self, url: &str) -> bool {
        self.non_indexed_urls.contains(&canonicalize(url))
    }

    /// Number of non-indexed pages, as shown on the visible counter
    pub fn count(&self) -> usize {
        self.non_indexed_urls.len()
    }
}
