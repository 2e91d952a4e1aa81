//! Sitemap text parser
//!
//! Sitemaps found in the wild are often not well-formed XML: unescaped `&` in
//! URLs, wrong encoding declarations, HTML entities, truncated files. Parsing
//! therefore runs two strategies in order:
//!
//! 1. **Structured**: a real XML pass with `quick-xml`. Any reader error marks
//!    the document as malformed and yields no entries.
//! 2. **Tolerant**: regex extraction of `<url>` blocks and their first `<loc>`
//!    and `<lastmod>`, case-insensitively.
//!
//! The tolerant pass runs only when the structured pass yields zero entries.

use crate::sitemap::{ParsedSitemap, SitemapEntry, SitemapFetchResult};
use crate::ScoutError;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

static URL_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:[\w.-]+:)?url(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?url\s*>")
        .expect("url block pattern is valid")
});

static LOC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:[\w.-]+:)?loc(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?loc\s*>")
        .expect("loc pattern is valid")
});

static LASTMOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:[\w.-]+:)?lastmod(?:\s[^>]*)?>(.*?)</(?:[\w.-]+:)?lastmod\s*>")
        .expect("lastmod pattern is valid")
});

/// Message used when neither strategy finds an entry
pub(crate) const NO_ENTRIES_MESSAGE: &str = "no valid URLs found in sitemap";

/// Parses raw sitemap text into its entries
///
/// # Returns
///
/// * `Ok(ParsedSitemap)` - At least one entry with a non-empty `<loc>`
/// * `Err(ScoutError::Parse)` - Neither strategy found an entry
///
/// # Example
///
/// ```
/// use sitemap_scout::sitemap::parse_sitemap;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc><lastmod>2024-01-01</lastmod></url>
/// </urlset>"#;
///
/// let sitemap = parse_sitemap(xml).unwrap();
/// assert_eq!(sitemap.count, 1);
/// assert_eq!(sitemap.last_modified, "2024-01-01");
/// ```
pub fn parse_sitemap(raw: &str) -> SitemapFetchResult {
    let mut entries = parse_structured(raw);

    if entries.is_empty() {
        tracing::debug!("Structured sitemap parse found no entries, using tolerant extraction");
        entries = parse_tolerant(raw);
    }

    if entries.is_empty() {
        return Err(ScoutError::Parse(NO_ENTRIES_MESSAGE.to_string()));
    }

    Ok(ParsedSitemap::from_entries(entries))
}

/// Which direct child of a `<url>` element is being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    LastMod,
}

/// An open `<url>` element
#[derive(Debug, Default)]
struct UrlFrame {
    depth: usize,
    loc: Option<String>,
    lastmod: Option<String>,
}

/// Text being collected for a `<loc>` or `<lastmod>` child
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

/// Structured XML pass
///
/// Collects every element whose local name is `url` (any namespace prefix)
/// and reads its direct `loc` and `lastmod` children. Returns an empty list
/// for malformed documents.
fn parse_structured(raw: &str) -> Vec<SitemapEntry> {
    let mut reader = Reader::from_str(raw);
    let mut entries = Vec::new();
    let mut frames: Vec<UrlFrame> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    "Sitemap is not well-formed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                return Vec::new();
            }
        };

        match event {
            Event::Start(start) => {
                depth += 1;
                saw_root = true;
                let name = start.local_name();
                let name = name.as_ref();

                if name.eq_ignore_ascii_case(b"url") {
                    frames.push(UrlFrame {
                        depth,
                        ..UrlFrame::default()
                    });
                } else if capture.is_none() {
                    if let Some(field) = field_for(name) {
                        if frames.last().is_some_and(|frame| frame.depth + 1 == depth) {
                            capture = Some(Capture {
                                field,
                                depth,
                                text: String::new(),
                            });
                        }
                    }
                }
            }
            Event::Empty(empty) => {
                saw_root = true;
                // `<loc/>` is an empty direct child: record it so a later
                // duplicate does not replace it
                if let Some(field) = field_for(empty.local_name().as_ref()) {
                    if let Some(frame) = frames.last_mut() {
                        if frame.depth == depth && capture.is_none() {
                            frame.set(field, String::new());
                        }
                    }
                }
            }
            Event::Text(text) => {
                if let Some(capture) = capture.as_mut() {
                    match text.unescape() {
                        Ok(unescaped) => capture.text.push_str(&unescaped),
                        Err(e) => {
                            tracing::debug!("Sitemap contains an invalid entity: {}", e);
                            return Vec::new();
                        }
                    }
                }
            }
            Event::CData(cdata) => {
                if let Some(capture) = capture.as_mut() {
                    capture
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|c| c.depth == depth) {
                    if let (Some(done), Some(frame)) = (capture.take(), frames.last_mut()) {
                        frame.set(done.field, done.text);
                    }
                }

                if frames.last().is_some_and(|frame| frame.depth == depth) {
                    if let Some(frame) = frames.pop() {
                        if let Some(entry) = frame.into_entry() {
                            entries.push(entry);
                        }
                    }
                }

                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root || depth != 0 {
        tracing::debug!("Sitemap has no root element or unclosed elements");
        return Vec::new();
    }

    entries
}

fn field_for(local_name: &[u8]) -> Option<Field> {
    if local_name.eq_ignore_ascii_case(b"loc") {
        Some(Field::Loc)
    } else if local_name.eq_ignore_ascii_case(b"lastmod") {
        Some(Field::LastMod)
    } else {
        None
    }
}

impl UrlFrame {
    /// Keeps the first occurrence of each field
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Loc => &mut self.loc,
            Field::LastMod => &mut self.lastmod,
        };
        if slot.is_none() {
            *slot = Some(text.trim().to_string());
        }
    }

    fn into_entry(self) -> Option<SitemapEntry> {
        let location = self.loc.filter(|loc| !loc.is_empty())?;
        Some(SitemapEntry {
            location,
            last_modified: self.lastmod.unwrap_or_default(),
        })
    }
}

/// Tolerant regex pass over the raw text
fn parse_tolerant(raw: &str) -> Vec<SitemapEntry> {
    URL_BLOCK_RE
        .captures_iter(raw)
        .filter_map(|block| {
            let body = block.get(1)?.as_str();
            let location = first_tag_text(&LOC_RE, body)?;
            if location.is_empty() {
                return None;
            }
            let last_modified = first_tag_text(&LASTMOD_RE, body).unwrap_or_default();
            Some(SitemapEntry {
                location,
                last_modified,
            })
        })
        .collect()
}

/// Text of the first match of `pattern`, with a CDATA wrapper removed and
/// predefined entities decoded where they are well-formed
fn first_tag_text(pattern: &Regex, body: &str) -> Option<String> {
    let raw = pattern.captures(body)?.get(1)?.as_str().trim();

    let inner = raw
        .strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .map(str::trim);

    let text = match inner {
        Some(cdata) => cdata.to_string(),
        None => quick_xml::escape::unescape(raw)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| raw.to_string()),
    };

    Some(text)
}
