//! Sitemap discovery by probing conventional paths

use crate::config::{FetchConfig, LocatorConfig};
use reqwest::Client;
use std::time::Duration;

/// Finds the sitemap of a host
///
/// Candidates are `{scheme}://{host}/{path}` for each configured path, tried
/// strictly in order with a HEAD request. The first 2xx answer wins.
#[derive(Debug, Clone)]
pub struct SitemapLocator {
    client: Client,
    scheme: String,
    paths: Vec<String>,
    probe_timeout: Duration,
}

impl SitemapLocator {
    /// Creates a locator from the locator and fetch settings
    pub fn new(client: Client, locator: &LocatorConfig, fetch: &FetchConfig) -> Self {
        Self {
            client,
            scheme: locator.scheme.clone(),
            paths: locator.paths.clone(),
            probe_timeout: Duration::from_millis(fetch.probe_timeout_ms),
        }
    }

    /// Candidate sitemap URLs for a host, in probe order
    ///
    /// `host` may carry a port (`example.com:8080`).
    pub fn candidate_urls(&self, host: &str) -> Vec<String> {
        self.paths
            .iter()
            .map(|path| format!("{}://{}/{}", self.scheme, host, path))
            .collect()
    }

    /// Returns the first candidate that answers the probe, if any
    pub async fn locate(&self, host: &str) -> Option<String> {
        for candidate in self.candidate_urls(host) {
            if self.probe(&candidate).await {
                tracing::info!("Found sitemap at {}", candidate);
                return Some(candidate);
            }
        }

        tracing::debug!("No sitemap found for {}", host);
        None
    }

    /// HEAD request without downloading a body
    ///
    /// Network errors and timeouts count as "not here".
    pub async fn probe(&self, url: &str) -> bool {
        match self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    tracing::debug!("Probe {} answered {}", url, response.status());
                }
                ok
            }
            Err(_) => false,
        }
    }
}
