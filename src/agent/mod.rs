//! Host adapter: wires browser-like events to checks and session state
//!
//! The [`Checker`] only answers "is this page in its sitemap?". The
//! [`Agent`] subscribes that question to host events (navigation, tab
//! activation, tab close), applies the answers to the [`SessionTracker`] and
//! keeps the host's visible counter in sync. It also serves the panel's
//! request/response calls.

mod cli_host;

pub use crate::checker::PageContext;
pub use crate::state::TabId;
pub use cli_host::CliHost;

use crate::checker::{annotate_links, extract_links, AnnotatedLink, CheckResult, Checker};
use crate::config::Config;
use crate::state::{counter_text, SessionTracker};
use std::sync::Arc;
use url::Url;

/// A browsing tab as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
}

/// Capabilities the host platform provides
///
/// Besides running fetches in a page (see [`PageContext`]), the host knows
/// which tab is active and shows a small counter next to each tab.
pub trait Host: PageContext {
    /// The currently active tab, if any
    fn active_tab(&self) -> Option<Tab>;

    /// Sets the visible counter of a tab; an empty string clears it
    fn set_visible_counter(&self, tab_id: TabId, text: &str);
}

/// Answer to the panel's check request
#[derive(Debug, Clone, PartialEq)]
pub struct PanelResponse {
    /// The check outcome
    pub result: CheckResult,

    /// The tab's non-indexed pages after applying the outcome
    pub non_indexed_urls: Vec<String>,
}

/// Background agent for one browsing session
pub struct Agent<H: Host + 'static> {
    host: Arc<H>,
    checker: Checker,
    tracker: SessionTracker,
}

impl<H: Host + 'static> Agent<H> {
    /// Creates an agent whose checks may fall back to the host's page context
    pub fn new(config: &Config, host: Arc<H>) -> crate::Result<Self> {
        let checker = Checker::new(config)?.with_page_context(host.clone());
        Ok(Self::with_checker(checker, host))
    }

    /// Creates an agent around a prepared checker
    pub fn with_checker(checker: Checker, host: Arc<H>) -> Self {
        Self {
            host,
            checker,
            tracker: SessionTracker::new(),
        }
    }

    /// The host this agent reports to
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// The checker used for every check
    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    /// The per-tab session state
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Panel request: checks a page and updates the tab's state and counter
    pub async fn check_sitemap(&self, page_url: &str, tab_id: TabId) -> PanelResponse {
        self.tracker.track(tab_id);
        let result = self.run_check(page_url, tab_id).await;
        PanelResponse {
            result,
            non_indexed_urls: self.tracker.non_indexed_urls(tab_id),
        }
    }

    /// Panel request: drops a page from the tab's non-indexed list
    ///
    /// # Returns
    ///
    /// The remaining non-indexed pages
    pub fn remove_non_indexed_url(&self, tab_id: TabId, url: &str) -> Vec<String> {
        let count = self.tracker.remove_entry(tab_id, url);
        self.host.set_visible_counter(tab_id, &counter_text(count));
        self.tracker.non_indexed_urls(tab_id)
    }

    /// Panel request: the tab's non-indexed pages as `<url>` blocks
    pub fn export_non_indexed(&self, tab_id: TabId, date_override: Option<&str>) -> String {
        self.tracker.export_entries(tab_id, date_override)
    }

    /// Panel request: canonical sitemap locations for a page's site
    ///
    /// Empty when the sitemap cannot be loaded.
    pub async fn get_sitemap_urls(&self, page_url: &str, tab_id: TabId) -> Vec<String> {
        match self.checker.sitemap_urls(page_url, Some(tab_id)).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Could not load sitemap URLs for {}: {}", page_url, e);
                Vec::new()
            }
        }
    }

    /// Marks the links of a page's HTML as listed or not in its sitemap
    pub async fn annotate_links(&self, page_url: &str, html: &str, tab_id: TabId) -> Vec<AnnotatedLink> {
        let Ok(base_url) = Url::parse(page_url) else {
            return Vec::new();
        };

        let links = extract_links(html, &base_url);
        let sitemap_urls = self.get_sitemap_urls(page_url, tab_id).await;
        annotate_links(&links, &sitemap_urls)
    }

    /// Host event: a tab finished navigating to `new_url`
    ///
    /// # Returns
    ///
    /// * `Some(CheckResult)` - A check ran for the new URL
    /// * `None` - The tab had already checked this exact URL
    pub async fn on_tab_navigated(&self, tab_id: TabId, new_url: &str) -> Option<CheckResult> {
        if self.tracker.skip_if_unchanged(tab_id, new_url) {
            return None;
        }
        Some(self.run_check(new_url, tab_id).await)
    }

    /// Host event: a tab became active
    ///
    /// Restores the tab's counter, then checks its current URL unless that
    /// URL was already checked.
    pub async fn on_tab_activated(&self, tab_id: TabId) -> Option<CheckResult> {
        self.host
            .set_visible_counter(tab_id, &counter_text(self.tracker.counter(tab_id)));

        let tab = self.host.active_tab().filter(|tab| tab.id == tab_id)?;
        self.on_tab_navigated(tab_id, &tab.url).await
    }

    /// Host event: a tab was closed
    pub fn on_tab_closed(&self, tab_id: TabId) {
        if self.tracker.on_tab_closed(tab_id) {
            tracing::debug!("Dropped session state of tab {}", tab_id);
        }
        self.host.set_visible_counter(tab_id, "");
    }

    async fn run_check(&self, page_url: &str, tab_id: TabId) -> CheckResult {
        let result = self.checker.check(page_url, Some(tab_id)).await;
        if let Some(count) = self.tracker.on_check_result(tab_id, &result) {
            self.host.set_visible_counter(tab_id, &counter_text(count));
        }
        result
    }
}
