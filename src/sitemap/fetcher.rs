//! HTTP fetcher for sitemap documents
//!
//! This module handles:
//! - Building the HTTP client with a proper user agent string
//! - Serving sitemap text from the cache while it is fresh
//! - Timed GET requests with a size guard on the declared and actual length
//! - Classifying failures into the crate error taxonomy
//!
//! Failures are never cached, so the next call goes back to the network.

use crate::config::{FetchConfig, UserAgentConfig};
use crate::sitemap::{parse_sitemap, SitemapCache, SitemapFetchResult};
use crate::ScoutError;
use reqwest::{redirect::Policy, Client, Response};
use std::sync::Arc;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sitemap_scout::config::UserAgentConfig;
/// use sitemap_scout::sitemap::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rejects a response whose declared length exceeds the ceiling
///
/// Runs before any of the body is read. A missing length passes; the read
/// limit in [`read_limited_body`] covers that case.
pub fn check_declared_size(url: &str, declared: Option<u64>, limit: u64) -> Result<(), ScoutError> {
    match declared {
        Some(size) if size > limit => Err(ScoutError::TooLarge {
            url: url.to_string(),
            size,
            limit,
        }),
        _ => Ok(()),
    }
}

/// Size ceilings applied to a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimits {
    /// Largest declared length accepted (`max-bytes`)
    pub declared: u64,

    /// Largest body accepted once actually read (`max-bytes * body-slack`)
    pub read: u64,
}

impl BodyLimits {
    /// Derives both ceilings from the fetch settings
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            declared: config.max_bytes,
            read: (config.max_bytes as f64 * config.body_slack) as u64,
        }
    }
}

/// Reads a response body as text without exceeding `limits`
///
/// The declared length is checked first; the body is then streamed chunk by
/// chunk and abandoned as soon as it passes the read ceiling. Invalid UTF-8
/// is replaced rather than rejected.
pub async fn read_limited_body(
    url: &str,
    mut response: Response,
    limits: BodyLimits,
    timeout: Duration,
) -> Result<String, ScoutError> {
    check_declared_size(url, response.content_length(), limits.declared)?;

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_error(url, e, timeout))?
    {
        body.extend_from_slice(&chunk);
        if body.len() as u64 > limits.read {
            return Err(ScoutError::TooLarge {
                url: url.to_string(),
                size: body.len() as u64,
                limit: limits.read,
            });
        }
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Maps a request failure to a `Network` error with a readable message
pub(crate) fn classify_error(url: &str, error: reqwest::Error, timeout: Duration) -> ScoutError {
    let message = if error.is_timeout() {
        format!("request timed out after {}ms", timeout.as_millis())
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    ScoutError::Network {
        url: url.to_string(),
        message,
    }
}

/// Fetches sitemap text through the shared cache
#[derive(Debug, Clone)]
pub struct SitemapFetcher {
    client: Client,
    cache: Arc<SitemapCache>,
    timeout: Duration,
    limits: BodyLimits,
}

impl SitemapFetcher {
    /// Creates a fetcher using `client` and storing into `cache`
    pub fn new(client: Client, cache: Arc<SitemapCache>, config: &FetchConfig) -> Self {
        Self {
            client,
            cache,
            timeout: Duration::from_millis(config.timeout_ms),
            limits: BodyLimits::from_config(config),
        }
    }

    /// Returns the cache this fetcher reads and writes
    pub fn cache(&self) -> &Arc<SitemapCache> {
        &self.cache
    }

    /// Largest body accepted once it is actually read
    pub fn body_limit(&self) -> u64 {
        self.limits.read
    }

    /// Fetches and parses a sitemap
    ///
    /// # Request Flow
    ///
    /// 1. Fresh cache record → parse it, no network call
    /// 2. GET with the configured timeout
    /// 3. Non-2xx status → `Network` error
    /// 4. Declared length over `max-bytes` → `TooLarge` before reading the body
    /// 5. Body over `max-bytes * body-slack` → `TooLarge`
    /// 6. Cache the text, then parse it
    pub async fn fetch(&self, sitemap_url: &str) -> SitemapFetchResult {
        if let Some(raw) = self.cache.get(sitemap_url) {
            tracing::debug!("Using cached sitemap {}", sitemap_url);
            return parse_sitemap(&raw);
        }

        let raw = self.download(sitemap_url).await?;
        self.cache.insert(sitemap_url, raw.as_str());
        parse_sitemap(&raw)
    }

    /// Downloads a document under the size and time limits, bypassing the cache
    pub async fn download(&self, url: &str) -> Result<String, ScoutError> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::Network {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let text = read_limited_body(url, response, self.limits, self.timeout).await?;
        tracing::debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }
}
