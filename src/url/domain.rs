use crate::UrlError;
use url::Url;

/// Parses a page URL the user is viewing
///
/// Only `http` and `https` pages can have a sitemap checked; browser-internal
/// pages and other schemes are rejected.
pub fn parse_page_url(page_url: &str) -> Result<Url, UrlError> {
    let url = Url::parse(page_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS pages are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Extracts the host of a URL, with its port when one is given explicitly
///
/// This is what candidate sitemap URLs are built on, so a page served from a
/// non-default port is probed on that same port.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_scout::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
