use serde::Deserialize;

/// Main configuration structure for Sitemap-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

/// Network limits for probing and fetching sitemaps
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Timeout for a full sitemap download (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Timeout for a HEAD existence probe (milliseconds)
    #[serde(rename = "probe-timeout-ms", default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Size ceiling for a sitemap body (bytes)
    #[serde(rename = "max-bytes", default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Multiplier on `max_bytes` tolerated once the body is actually read
    #[serde(rename = "body-slack", default = "default_body_slack")]
    pub body_slack: f64,

    /// How long a fetched sitemap stays cached (seconds)
    #[serde(rename = "cache-ttl-secs", default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

/// Where to look for a sitemap on a host
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorConfig {
    /// Scheme used to build candidate URLs
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Candidate paths, probed in order
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the tool
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,
}

/// Settings for results shown to the user
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Maximum number of sitemap entries carried in a report preview
    #[serde(rename = "preview-limit", default = "default_preview_limit")]
    pub preview_limit: usize,
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_body_slack() -> f64 {
    1.2
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_paths() -> Vec<String> {
    vec!["sitemap.xml".to_string(), "sitemap_index.xml".to_string()]
}

fn default_crawler_name() -> String {
    "SitemapScout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://github.com/sitemap-scout/sitemap-scout".to_string()
}

fn default_preview_limit() -> usize {
    50
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            max_bytes: default_max_bytes(),
            body_slack: default_body_slack(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            paths: default_paths(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            preview_limit: default_preview_limit(),
        }
    }
}
