//! Raw sitemap text caching
//!
//! Repeated checks against the same site (tab switches, re-opened panels,
//! several pages of one site) reuse the downloaded sitemap text for a bounded
//! time instead of hitting the network again.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Cached raw sitemap text for one sitemap URL
#[derive(Debug, Clone)]
pub struct CacheRecord {
    /// The sitemap URL this text was fetched from
    pub sitemap_url: String,

    /// The response body, undecoded beyond UTF-8
    pub raw_text: String,

    /// When the text was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Creates a new record stamped with the current time
    pub fn new(sitemap_url: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            raw_text: raw_text.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Returns how long ago the text was fetched
    ///
    /// A timestamp in the future (clock adjustment) counts as age zero.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Checks if the record has reached the time-to-live
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

/// Process-wide cache of raw sitemap text, keyed by sitemap URL
///
/// Holds at most one record per URL; a newer fetch replaces the older record.
/// Reads never return a record at or past the time-to-live: a stale record is
/// dropped and reported as absent.
#[derive(Debug)]
pub struct SitemapCache {
    ttl: Duration,
    records: Mutex<HashMap<String, CacheRecord>>,
}

impl SitemapCache {
    /// Creates an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached text for a sitemap URL if it is still fresh
    pub fn get(&self, sitemap_url: &str) -> Option<String> {
        let mut records = self.lock();

        let age = match records.get(sitemap_url) {
            Some(record) if !record.is_stale(self.ttl) => return Some(record.raw_text.clone()),
            Some(record) => record.age(),
            None => return None,
        };

        tracing::debug!(
            "Cached sitemap {} expired ({}s old)",
            sitemap_url,
            age.as_secs()
        );
        records.remove(sitemap_url);
        None
    }

    /// Stores freshly fetched text, replacing any previous record
    pub fn insert(&self, sitemap_url: &str, raw_text: impl Into<String>) {
        self.insert_record(CacheRecord::new(sitemap_url, raw_text));
    }

    /// Stores a prepared record under its own sitemap URL
    pub fn insert_record(&self, record: CacheRecord) {
        self.lock().insert(record.sitemap_url.clone(), record);
    }

    /// Drops every stale record, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| !record.is_stale(ttl));
        before - records.len()
    }

    /// Removes every record
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of records held, fresh or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no records are held
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheRecord>> {
        // Every write is a single-key replacement, so a poisoned map is still consistent
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
