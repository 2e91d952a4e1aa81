//! Per-tab session state
//!
//! This module tracks what the checks of each browsing tab have found.
//!
//! # Components
//!
//! - `TabSessionState`: last checked URL and the pages found missing from
//!   their sitemap ("non-indexed") for one tab
//! - `SessionTracker`: the process-wide map of tab states and the operations
//!   that mutate it

mod tab_state;
mod tracker;

// Re-export main types
pub use tab_state::{TabSessionState, TabStatus};
pub use tracker::SessionTracker;

/// Opaque identifier of a browsing tab, assigned by the host
pub type TabId = u64;

/// Text of the visible counter for a number of non-indexed pages
///
/// Zero clears the counter, so it renders as an empty string.
pub fn counter_text(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}
