//! Output module for rendering results
//!
//! This module turns check results and session state into text:
//! - Terminal summaries of checks and annotated links
//! - The `<url>` fragment export of non-indexed pages

mod console;
mod export;

pub use console::{render_check_result, render_links};
pub use export::{render_url_entries, resolve_lastmod};
