//! Configuration module for Sitemap-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Fetch timeout: {}ms", config.fetch.timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, LocatorConfig, PanelConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
