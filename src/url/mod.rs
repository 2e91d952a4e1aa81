//! URL handling module for Sitemap-Scout
//!
//! This module provides URL canonicalization, page URL parsing, host
//! extraction and sitemap membership matching. Every comparison between a
//! page and a sitemap entry goes through [`canonicalize`], so "found" and
//! "non-indexed" tracking share one identity rule.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_host, parse_page_url};
pub use matcher::find_match;
pub use normalize::canonicalize;
