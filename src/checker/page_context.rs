use crate::state::TabId;
use async_trait::async_trait;

/// Fetches a URL from inside a browsing tab's own origin
///
/// A sitemap the background client cannot read (typically because of a
/// cross-origin restriction) is usually readable by the page it belongs to.
/// Implementations return the raw response text; parsing stays with the
/// caller.
#[async_trait]
pub trait PageContext: Send + Sync {
    /// Fetches `url` as the page open in `tab_id` would
    async fn fetch_in_page(&self, tab_id: TabId, url: &str) -> crate::Result<String>;
}
