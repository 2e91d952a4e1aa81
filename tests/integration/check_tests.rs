use crate::common::*;
use sitemap_scout::{Checker, ErrorKind, ScoutError};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_page_found_despite_query_and_trailing_slash() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(
        &server,
        "/sitemap.xml",
        format!(
            "<urlset><url><loc>{}/page</loc><lastmod>2024-01-01</lastmod></url></urlset>",
            base
        ),
    )
    .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let result = checker.check(&format!("{}/page/?utm=1", base), None).await;

    let report = result.report().expect("check should succeed");
    assert!(report.url_found);
    assert_eq!(report.sitemap_url, format!("http://{}/sitemap.xml", host_of(&server)));
    assert_eq!(report.total_urls, 1);
    assert_eq!(report.last_modified, "2024-01-01");

    let matched = report.matched_entry.as_ref().unwrap();
    assert_eq!(matched.location, format!("{}/page", base));
    assert_eq!(matched.last_modified, "2024-01-01");
}

#[tokio::test]
async fn test_page_not_listed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(&server, "/sitemap.xml", sitemap_xml(&base, &["/", "/about", "/blog"])).await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let result = checker.check(&format!("{}/contact", base), None).await;

    assert!(!result.has_error());
    assert!(!result.url_found());
    let report = result.report().unwrap();
    assert_eq!(report.total_urls, 3);
    assert!(report.matched_entry.is_none());
    assert_eq!(report.preview.len(), 3);
}

#[tokio::test]
async fn test_locator_falls_through_to_second_path() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 404).await;
    mount_probe(&server, "/sitemap_index.xml", 200).await;
    mount_sitemap(&server, "/sitemap_index.xml", sitemap_xml(&base, &["/"])).await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let report = checker.try_check(&format!("{}/", base), None).await.unwrap();

    assert!(report.sitemap_url.ends_with("/sitemap_index.xml"));
    assert!(report.url_found);
}

#[tokio::test]
async fn test_locator_stops_at_first_hit() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("HEAD"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_sitemap(&server, "/sitemap.xml", sitemap_xml(&base, &["/"])).await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let report = checker.try_check(&format!("{}/", base), None).await.unwrap();

    assert!(report.sitemap_url.ends_with("/sitemap.xml"));
    server.verify().await;
}

#[tokio::test]
async fn test_no_sitemap_found() {
    let server = MockServer::start().await;

    mount_probe(&server, "/sitemap.xml", 404).await;
    mount_probe(&server, "/sitemap_index.xml", 500).await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let result = checker.check(&format!("{}/page", server.uri()), None).await;

    assert!(result.has_error());
    assert_eq!(result.error_message(), Some("No sitemap found on this site"));

    let error = checker
        .try_check(&format!("{}/page", server.uri()), None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_cache_serves_second_check() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&base, &["/a", "/b"])))
        .expect(1)
        .mount(&server)
        .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let first = checker.check(&format!("{}/a", base), None).await;
    let second = checker.check(&format!("{}/b", base), None).await;

    assert!(first.url_found());
    assert!(second.url_found());
    assert_eq!(checker.cache().len(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_zero_ttl_fetches_every_time() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&base, &["/a"])))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.fetch.cache_ttl_secs = 0;
    let checker = Checker::new(&config).unwrap();

    checker.check(&format!("{}/a", base), None).await;
    checker.check(&format!("{}/a", base), None).await;

    server.verify().await;
}

#[tokio::test]
async fn test_checkers_share_cache() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&base, &["/a"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config();
    let first = Checker::new(&config).unwrap();
    let second = Checker::with_cache(&config, first.cache().clone()).unwrap();

    assert!(first.check(&format!("{}/a", base), None).await.url_found());
    assert!(second.check(&format!("{}/a", base), None).await.url_found());

    server.verify().await;
}

#[tokio::test]
async fn test_declared_size_over_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    let paths: Vec<String> = (0..50).map(|i| format!("/page-{}", i)).collect();
    let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(&server, "/sitemap.xml", sitemap_xml(&base, &paths)).await;

    let mut config = create_test_config();
    config.fetch.max_bytes = 256;
    let checker = Checker::new(&config).unwrap();

    let error = checker
        .try_check(&format!("{}/page-1", base), None)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TooLarge);
    assert!(error.to_string().contains("too large"));
    assert!(checker.cache().is_empty());
}

#[tokio::test]
async fn test_http_error_status_is_network_error() {
    let server = MockServer::start().await;

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let page = format!("{}/page", server.uri());

    let error = checker.try_check(&page, None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert!(error.to_string().contains("HTTP 503"));

    // Failures are not cached
    checker.check(&page, None).await;
    server.verify().await;
}

#[tokio::test]
async fn test_malformed_sitemap_parsed_tolerantly() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(
        &server,
        "/sitemap.xml",
        format!(
            "<urlset><url><loc>{base}/search?a=1&b=2</loc></url><url><loc>{base}/about</loc></url>",
            base = base
        ),
    )
    .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let report = checker
        .try_check(&format!("{}/about/", base), None)
        .await
        .unwrap();

    assert!(report.url_found);
    assert_eq!(report.total_urls, 2);
    assert_eq!(report.preview[0].location, format!("{}/search?a=1&b=2", base));
    assert_eq!(report.last_modified, "");
}

#[tokio::test]
async fn test_html_instead_of_sitemap_is_parse_error() {
    let server = MockServer::start().await;

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(
        &server,
        "/sitemap.xml",
        "<html><body>Not here</body></html>".to_string(),
    )
    .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let result = checker.check(&format!("{}/page", server.uri()), None).await;

    assert_eq!(
        result.error_message(),
        Some("Parse error: no valid URLs found in sitemap")
    );
}

#[tokio::test]
async fn test_invalid_page_url_never_reaches_network() {
    let checker = Checker::new(&create_test_config()).unwrap();

    let result = checker.check("not a url", None).await;
    assert!(result.has_error());

    let error = checker.try_check("ftp://example.com/file", None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_timeout_retried_from_page_context() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sitemap_xml(&base, &["/"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.fetch.timeout_ms = 200;

    let page_context = Arc::new(StubPageContext::returning(Some(sitemap_xml(
        &base,
        &["/", "/relayed"],
    ))));
    let checker = Checker::new(&config)
        .unwrap()
        .with_page_context(page_context.clone());

    let report = checker
        .try_check(&format!("{}/relayed", base), Some(7))
        .await
        .unwrap();

    assert!(report.url_found);
    assert_eq!(report.total_urls, 2);
    assert_eq!(page_context.call_count(), 1);

    // Relayed text is cached like a direct fetch
    let sitemap_url = format!("{}/sitemap.xml", base);
    assert!(checker.cache().get(&sitemap_url).is_some());
}

#[tokio::test]
async fn test_timeout_without_tab_is_not_retried() {
    let server = MockServer::start().await;

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.fetch.timeout_ms = 200;

    let page_context = Arc::new(StubPageContext::returning(Some("<urlset/>".to_string())));
    let checker = Checker::new(&config)
        .unwrap()
        .with_page_context(page_context.clone());

    let error = checker
        .try_check(&format!("{}/page", server.uri()), None)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Network);
    assert!(error.to_string().contains("timed out"));
    assert_eq!(page_context.call_count(), 0);
}

#[tokio::test]
async fn test_failed_retry_keeps_original_error() {
    let server = MockServer::start().await;

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let mut config = create_test_config();
    config.fetch.timeout_ms = 200;

    let page_context = Arc::new(StubPageContext::returning(None));
    let checker = Checker::new(&config)
        .unwrap()
        .with_page_context(page_context.clone());

    let result = checker
        .check(&format!("{}/page", server.uri()), Some(3))
        .await;

    let message = result.error_message().unwrap();
    assert!(message.contains("timed out"));
    assert!(!message.contains("blocked in page"));
    assert_eq!(page_context.call_count(), 1);
}

#[tokio::test]
async fn test_challenge_page_retried_from_page_context() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(
        &server,
        "/sitemap.xml",
        "<html><body>Checking your browser</body></html>".to_string(),
    )
    .await;

    let page_context = Arc::new(StubPageContext::returning(Some(sitemap_xml(
        &base,
        &["/", "/pricing"],
    ))));
    let checker = Checker::new(&create_test_config())
        .unwrap()
        .with_page_context(page_context.clone());

    let result = checker.check(&format!("{}/pricing", base), Some(5)).await;

    assert!(!result.has_error(), "{:?}", result.error_message());
    assert!(result.url_found());
    assert_eq!(page_context.call_count(), 1);
}

#[tokio::test]
async fn test_error_status_retried_from_page_context() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let page_context = Arc::new(StubPageContext::returning(Some(sitemap_xml(&base, &["/"]))));
    let checker = Checker::new(&create_test_config())
        .unwrap()
        .with_page_context(page_context.clone());

    let report = checker.try_check(&format!("{}/", base), Some(2)).await.unwrap();
    assert!(report.url_found);
    assert_eq!(page_context.call_count(), 1);
}

#[tokio::test]
async fn test_oversized_relay_keeps_size_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(&server, "/sitemap.xml", sitemap_xml(&base, &["/a", "/b", "/c", "/d"])).await;

    let mut config = create_test_config();
    config.fetch.max_bytes = 64;

    let page_context = Arc::new(StubPageContext::returning(Some(sitemap_xml(
        &base,
        &["/a", "/b", "/c", "/d"],
    ))));
    let checker = Checker::new(&config)
        .unwrap()
        .with_page_context(page_context.clone());

    let error = checker
        .try_check(&format!("{}/a", base), Some(1))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::TooLarge);
    assert_eq!(page_context.call_count(), 1);
    assert!(checker.cache().is_empty());
}

#[tokio::test]
async fn test_streamed_body_over_limit_without_length() {
    let base_paths: Vec<String> = (0..100).map(|i| format!("/article-{}", i)).collect();
    let base_paths: Vec<&str> = base_paths.iter().map(String::as_str).collect();

    let host = spawn_chunked_server(|base| sitemap_xml(base, &base_paths)).await;

    let mut config = create_test_config();
    config.fetch.max_bytes = 1024;
    let checker = Checker::new(&config).unwrap();

    let error = checker
        .try_check(&format!("http://{}/article-1", host), None)
        .await
        .unwrap_err();

    match &error {
        ScoutError::TooLarge { size, limit, .. } => {
            assert_eq!(*limit, 1228);
            assert!(*size > 1228);
        }
        other => panic!("expected TooLarge, got {:?}", other),
    }
    assert!(checker.cache().is_empty());
}

#[tokio::test]
async fn test_streamed_body_within_limit_without_length() {
    let host = spawn_chunked_server(|base| sitemap_xml(base, &["/", "/article-1"])).await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let report = checker
        .try_check(&format!("http://{}/article-1", host), None)
        .await
        .unwrap();

    assert!(report.url_found);
    assert_eq!(report.total_urls, 2);
}

#[tokio::test]
async fn test_sitemap_urls_are_canonical() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_probe(&server, "/sitemap.xml", 200).await;
    mount_sitemap(
        &server,
        "/sitemap.xml",
        format!(
            "<urlset><url><loc>{base}/a/</loc></url><url><loc>{base}/b?x=1#top</loc></url></urlset>",
            base = base
        ),
    )
    .await;

    let checker = Checker::new(&create_test_config()).unwrap();
    let urls = checker
        .sitemap_urls(&format!("{}/", base), None)
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);
}
