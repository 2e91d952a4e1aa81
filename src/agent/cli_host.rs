use crate::agent::{Host, PageContext, Tab, TabId};
use crate::config::Config;
use crate::sitemap::{build_http_client, classify_error, read_limited_body, BodyLimits};
use crate::ScoutError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// Host for command-line sessions
///
/// Tabs are simulated: the CLI opens one per URL it checks. There is no real
/// page to run code in, so the page-context fetch re-issues the request as
/// the tab's page would, with its URL as `Referer` and its origin as
/// `Origin`, under the same size ceilings as a direct fetch. Counters are
/// logged and kept for inspection.
pub struct CliHost {
    client: Client,
    timeout: Duration,
    limits: BodyLimits,
    tabs: Mutex<HashMap<TabId, String>>,
    active: Mutex<Option<TabId>>,
    counters: Mutex<HashMap<TabId, String>>,
}

impl CliHost {
    /// Creates a host with no tabs
    pub fn new(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            client: build_http_client(&config.user_agent)?,
            timeout: Duration::from_millis(config.fetch.timeout_ms),
            limits: BodyLimits::from_config(&config.fetch),
            tabs: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            counters: Mutex::new(HashMap::new()),
        })
    }

    /// Points a tab at `url` and makes it the active tab
    pub fn open_tab(&self, tab_id: TabId, url: &str) {
        lock(&self.tabs).insert(tab_id, url.to_string());
        *lock(&self.active) = Some(tab_id);
    }

    /// Forgets a tab
    pub fn close_tab(&self, tab_id: TabId) {
        lock(&self.tabs).remove(&tab_id);
        let mut active = lock(&self.active);
        if *active == Some(tab_id) {
            *active = None;
        }
    }

    /// The counter text last set for a tab, if it is showing one
    pub fn counter(&self, tab_id: TabId) -> Option<String> {
        lock(&self.counters).get(&tab_id).cloned()
    }
}

#[async_trait]
impl PageContext for CliHost {
    async fn fetch_in_page(&self, tab_id: TabId, url: &str) -> crate::Result<String> {
        let page_url = lock(&self.tabs).get(&tab_id).cloned().ok_or_else(|| {
            ScoutError::InvalidInput(format!("tab {} has no page loaded", tab_id))
        })?;

        let mut request = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(REFERER, page_url.as_str())
            .header(ACCEPT, "application/xml,text/xml;q=0.9,*/*;q=0.8");

        if let Ok(page) = Url::parse(&page_url) {
            request = request.header(ORIGIN, page.origin().ascii_serialization());
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e, self.timeout))?;

        if !response.status().is_success() {
            return Err(ScoutError::Network {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        read_limited_body(url, response, self.limits, self.timeout).await
    }
}

impl Host for CliHost {
    fn active_tab(&self) -> Option<Tab> {
        let id = (*lock(&self.active))?;
        let url = lock(&self.tabs).get(&id).cloned()?;
        Some(Tab { id, url })
    }

    fn set_visible_counter(&self, tab_id: TabId, text: &str) {
        let mut counters = lock(&self.counters);
        if text.is_empty() {
            counters.remove(&tab_id);
        } else {
            tracing::info!("Tab {}: {} page(s) not in sitemap", tab_id, text);
            counters.insert(tab_id, text.to_string());
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
