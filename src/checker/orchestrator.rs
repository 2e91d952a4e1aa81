use crate::checker::{CheckResult, PageContext, SitemapReport};
use crate::config::Config;
use crate::sitemap::{
    build_http_client, parse_sitemap, ParsedSitemap, SitemapCache, SitemapFetchResult,
    SitemapFetcher, SitemapLocator,
};
use crate::state::TabId;
use crate::url::{canonicalize, extract_host, find_match, parse_page_url};
use crate::{Result, ScoutError, UrlError};
use std::sync::Arc;
use std::time::Duration;

/// Runs sitemap checks for page URLs
///
/// A `Checker` is cheap to share behind an `Arc`; concurrent checks are not
/// serialized and only meet in the sitemap cache.
pub struct Checker {
    locator: SitemapLocator,
    fetcher: SitemapFetcher,
    page_context: Option<Arc<dyn PageContext>>,
    preview_limit: usize,
}

impl Checker {
    /// Creates a checker with its own cache
    ///
    /// # Returns
    ///
    /// * `Ok(Checker)` - Ready to run checks
    /// * `Err(ScoutError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self> {
        let cache = Arc::new(SitemapCache::new(Duration::from_secs(
            config.fetch.cache_ttl_secs,
        )));
        Self::with_cache(config, cache)
    }

    /// Creates a checker that shares an existing cache
    pub fn with_cache(config: &Config, cache: Arc<SitemapCache>) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            locator: SitemapLocator::new(client.clone(), &config.locator, &config.fetch),
            fetcher: SitemapFetcher::new(client, cache, &config.fetch),
            page_context: None,
            preview_limit: config.panel.preview_limit,
        })
    }

    /// Enables the page-context retry for checks that carry a tab id
    pub fn with_page_context(mut self, page_context: Arc<dyn PageContext>) -> Self {
        self.page_context = Some(page_context);
        self
    }

    /// The sitemap cache used by this checker
    pub fn cache(&self) -> &Arc<SitemapCache> {
        self.fetcher.cache()
    }

    /// Checks whether `page_url` is listed in its site's sitemap
    ///
    /// Never fails: every error becomes [`CheckResult::Error`].
    pub async fn check(&self, page_url: &str, tab_id: Option<TabId>) -> CheckResult {
        match self.try_check(page_url, tab_id).await {
            Ok(report) => {
                tracing::info!(
                    "{} {} in {} ({} URLs)",
                    page_url,
                    if report.url_found { "found" } else { "not found" },
                    report.sitemap_url,
                    report.total_urls
                );
                CheckResult::Success(report)
            }
            Err(e) => {
                tracing::warn!("Sitemap check for {} failed: {}", page_url, e);
                CheckResult::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Same as [`Checker::check`], keeping the typed error
    pub async fn try_check(&self, page_url: &str, tab_id: Option<TabId>) -> Result<SitemapReport> {
        let (sitemap_url, sitemap) = self.load_sitemap(page_url, tab_id).await?;
        let matched_entry = find_match(page_url, &sitemap.entries).cloned();

        Ok(SitemapReport {
            current_url: page_url.to_string(),
            sitemap_url,
            url_found: matched_entry.is_some(),
            matched_entry,
            total_urls: sitemap.count,
            last_modified: sitemap.last_modified,
            preview: sitemap
                .entries
                .into_iter()
                .take(self.preview_limit)
                .collect(),
        })
    }

    /// Canonical locations of every entry in the page's sitemap
    pub async fn sitemap_urls(&self, page_url: &str, tab_id: Option<TabId>) -> Result<Vec<String>> {
        let (_, sitemap) = self.load_sitemap(page_url, tab_id).await?;
        Ok(sitemap
            .entries
            .iter()
            .map(|entry| canonicalize(&entry.location))
            .collect())
    }

    /// Downloads a page's HTML under the same limits as a sitemap
    pub async fn fetch_page(&self, page_url: &str) -> Result<String> {
        let url = parse_page_url(page_url)?;
        self.fetcher.download(url.as_str()).await
    }

    /// Locates and loads the sitemap for a page
    ///
    /// # Returns
    ///
    /// * `Ok((sitemap_url, sitemap))` - The sitemap and where it was found
    /// * `Err(ScoutError::InvalidInput | UrlError)` - The page URL is unusable
    /// * `Err(ScoutError::NotFound)` - No candidate path answered
    /// * `Err(_)` - The fetch or parse failed, also from the page context
    pub async fn load_sitemap(
        &self,
        page_url: &str,
        tab_id: Option<TabId>,
    ) -> Result<(String, ParsedSitemap)> {
        let url = parse_page_url(page_url)?;
        let host = extract_host(&url).ok_or(UrlError::MissingHost)?;

        let sitemap_url = self
            .locator
            .locate(&host)
            .await
            .ok_or(ScoutError::NotFound)?;

        let sitemap = self.fetch_with_fallback(&sitemap_url, tab_id).await?;
        Ok((sitemap_url, sitemap))
    }

    /// Fetches a sitemap, retrying from the tab's page when the direct fetch fails
    ///
    /// Any failure is retried: the page's origin may be served real XML where
    /// the direct request got an error status or a challenge page. Relayed
    /// text is held to the same body limit. When the retry fails too, the
    /// direct fetch's error is returned.
    async fn fetch_with_fallback(&self, sitemap_url: &str, tab_id: Option<TabId>) -> SitemapFetchResult {
        let direct_error = match self.fetcher.fetch(sitemap_url).await {
            Ok(sitemap) => return Ok(sitemap),
            Err(e) => e,
        };

        let (Some(tab_id), Some(page_context)) = (tab_id, self.page_context.as_ref()) else {
            return Err(direct_error);
        };

        tracing::warn!(
            "Direct fetch of {} failed ({}), retrying from tab {}",
            sitemap_url,
            direct_error,
            tab_id
        );

        let text = match page_context.fetch_in_page(tab_id, sitemap_url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Page-context fetch of {} failed: {}", sitemap_url, e);
                return Err(direct_error);
            }
        };

        if text.len() as u64 > self.fetcher.body_limit() {
            tracing::debug!(
                "Page-context fetch of {} returned {} bytes, over the limit",
                sitemap_url,
                text.len()
            );
            return Err(direct_error);
        }

        match parse_sitemap(&text) {
            Ok(sitemap) => {
                self.cache().insert(sitemap_url, text);
                Ok(sitemap)
            }
            Err(e) => {
                tracing::debug!("Page-context text for {} did not parse: {}", sitemap_url, e);
                Err(direct_error)
            }
        }
    }
}
