use url::Url;

/// Reduces a URL to the form used for sitemap membership comparisons
///
/// # Canonicalization Steps
///
/// 1. Parse the URL (host is lowercased by the parser, dot segments resolved)
/// 2. Keep scheme, host, non-default port and path
/// 3. Drop userinfo, query string and fragment
/// 4. Remove trailing slashes from the path, except for the root `/`
///
/// Input that does not parse as an absolute URL with a host is handled
/// textually: everything from the first `?` or `#` is cut and trailing
/// slashes are removed. This function never fails.
///
/// Applying it twice gives the same result as applying it once.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::canonicalize;
///
/// assert_eq!(canonicalize("https://Example.com/page/?utm=1#top"), "https://example.com/page");
/// assert_eq!(canonicalize("https://example.com/"), "https://example.com/");
/// assert_eq!(canonicalize("/relative/path/?q"), "/relative/path");
/// ```
pub fn canonicalize(url_str: &str) -> String {
    let trimmed = url_str.trim();

    match Url::parse(trimmed) {
        Ok(url) => match url.host_str() {
            Some(host) => {
                let mut canonical = format!("{}://{}", url.scheme(), host);
                if let Some(port) = url.port() {
                    canonical.push(':');
                    canonical.push_str(&port.to_string());
                }
                canonical.push_str(strip_trailing_slashes(url.path()));
                canonical
            }
            None => canonicalize_raw(trimmed),
        },
        Err(_) => canonicalize_raw(trimmed),
    }
}

/// Textual fallback for strings the URL parser rejects
fn canonicalize_raw(raw: &str) -> String {
    let end = raw.find(|c| c == '?' || c == '#').unwrap_or(raw.len());
    let base = &raw[..end];

    if base.is_empty() {
        return String::new();
    }

    strip_trailing_slashes(base).to_string()
}

fn strip_trailing_slashes(path: &str) -> &str {
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() && path.starts_with('/') {
        "/"
    } else {
        stripped
    }
}
