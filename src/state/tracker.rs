//! Process-wide per-tab session map
//!
//! A tab gets an entry when a check for it starts (navigation or a panel
//! request) and loses it when the tab closes. Check outcomes are only applied
//! to tabs that still have an entry, so a check that finishes after its tab
//! closed leaves nothing behind.

use crate::checker::CheckResult;
use crate::output::{render_url_entries, resolve_lastmod};
use crate::state::{TabId, TabSessionState};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Owns the session state of every tab
///
/// Each operation touches a single tab's entry under one short lock, so
/// interleaved checks from different tabs cannot disturb each other. A slow
/// check that finishes after a newer one is applied as normal; the newer
/// outcome simply gets overwritten by it.
#[derive(Debug, Default)]
pub struct SessionTracker {
    tabs: Mutex<HashMap<TabId, TabSessionState>>,
}

impl SessionTracker {
    /// Creates a tracker with no tabs
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a tab; a tab that is already tracked is left as is
    pub fn track(&self, tab_id: TabId) {
        self.lock().entry(tab_id).or_default();
    }

    /// Applies a check outcome to a tracked tab
    ///
    /// # Returns
    ///
    /// * `Some(count)` - The tab's non-indexed count after the update
    /// * `None` - The tab is not tracked (closed while the check ran)
    pub fn on_check_result(&self, tab_id: TabId, result: &CheckResult) -> Option<usize> {
        let mut tabs = self.lock();
        let Some(state) = tabs.get_mut(&tab_id) else {
            tracing::debug!("Dropping check result for untracked tab {}", tab_id);
            return None;
        };
        state.apply(result);

        tracing::debug!(
            "Tab {} now has {} non-indexed page(s)",
            tab_id,
            state.count()
        );
        Some(state.count())
    }

    /// Records `url` as the tab's last checked URL unless it already is
    ///
    /// Starts tracking the tab if it was not tracked yet.
    ///
    /// # Returns
    ///
    /// * `true` - The tab last checked this exact URL; skip the check
    /// * `false` - The URL is new for this tab and is now recorded
    pub fn skip_if_unchanged(&self, tab_id: TabId, url: &str) -> bool {
        let mut tabs = self.lock();
        let state = tabs.entry(tab_id).or_default();

        if state.last_checked_url.as_deref() == Some(url) {
            tracing::debug!("Tab {} already checked {}, skipping", tab_id, url);
            return true;
        }

        state.last_checked_url = Some(url.to_string());
        false
    }

    /// Removes a page from a tab's non-indexed set at the user's request
    ///
    /// # Returns
    ///
    /// The tab's non-indexed count after the removal
    pub fn remove_entry(&self, tab_id: TabId, url: &str) -> usize {
        let mut tabs = self.lock();
        match tabs.get_mut(&tab_id) {
            Some(state) => {
                if state.remove(url) {
                    tracing::debug!("Removed {} from tab {}", url, tab_id);
                }
                state.count()
            }
            None => 0,
        }
    }

    /// Renders a tab's non-indexed pages as sitemap `<url>` blocks
    ///
    /// Every block gets the same `<lastmod>`: `lastmod_override` when it
    /// parses as a date, otherwise the current time. Returns an empty string
    /// when the tab has no non-indexed pages.
    pub fn export_entries(&self, tab_id: TabId, lastmod_override: Option<&str>) -> String {
        let urls = self.non_indexed_urls(tab_id);
        if urls.is_empty() {
            return String::new();
        }

        let lastmod = resolve_lastmod(lastmod_override, Utc::now());
        render_url_entries(urls.iter().map(String::as_str), &lastmod)
    }

    /// Discards all state of a closed tab; returns true if it had any
    pub fn on_tab_closed(&self, tab_id: TabId) -> bool {
        self.lock().remove(&tab_id).is_some()
    }

    /// A tab's non-indexed pages, in sorted order
    pub fn non_indexed_urls(&self, tab_id: TabId) -> Vec<String> {
        self.lock()
            .get(&tab_id)
            .map(|state| state.non_indexed_urls.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// A tab's non-indexed count (zero for unknown tabs)
    pub fn counter(&self, tab_id: TabId) -> usize {
        self.lock()
            .get(&tab_id)
            .map(TabSessionState::count)
            .unwrap_or(0)
    }

    /// Snapshot of a tab's state
    pub fn state(&self, tab_id: TabId) -> Option<TabSessionState> {
        self.lock().get(&tab_id).cloned()
    }

    /// Number of tabs with state
    pub fn tab_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TabId, TabSessionState>> {
        self.tabs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
