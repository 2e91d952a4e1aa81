//! Integration tests for sitemap checks
//!
//! These tests use wiremock to serve sitemaps from a mock HTTP server and
//! exercise locating, fetching, caching, fallback and session tracking
//! end-to-end.

mod check_tests;
