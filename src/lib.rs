//! Sitemap-Scout: is this page in the site's sitemap?
//!
//! This crate locates a site's XML sitemap, fetches it under size and time
//! limits, parses it (tolerating malformed XML), and checks whether a page URL
//! is listed. Per-tab session state tracks pages found missing from their
//! sitemap and exposes them as a visible counter and an exportable fragment.

pub mod agent;
pub mod checker;
pub mod config;
pub mod output;
pub mod sitemap;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No sitemap found on this site")]
    NotFound,

    #[error("Failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("Sitemap at {url} is too large ({size} bytes, limit {limit} bytes)")]
    TooLarge { url: String, size: u64, limit: u64 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`ScoutError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Network,
    TooLarge,
    Parse,
    InvalidInput,
    Config,
}

impl ScoutError {
    /// Returns the taxonomy tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Network { .. } | Self::Client(_) | Self::Io(_) => ErrorKind::Network,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::Parse(_) => ErrorKind::Parse,
            Self::InvalidInput(_) | Self::UrlError(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sitemap-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use agent::{Agent, Host, PageContext, PanelResponse, Tab, TabId};
pub use checker::{CheckResult, Checker, SitemapReport};
pub use config::Config;
pub use sitemap::{ParsedSitemap, SitemapCache, SitemapEntry, SitemapFetchResult};
pub use state::SessionTracker;
pub use crate::url::{canonicalize, find_match};
