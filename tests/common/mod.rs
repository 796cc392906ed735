//! Test utilities and helper functions for the antidote test suite

use std::sync::Arc;

use antidote::{Antidote, CollectingReporter, CureConfig, HttpFetcher};
use mockito::{Matcher, Mock, Server, ServerGuard};

/// Starts a mock HTTP server for one test
#[allow(dead_code)]
pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

/// Creates a test HTML document with the given head and body markup
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Test Page</title>
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an asset body
#[allow(dead_code)]
pub async fn create_asset_mock(
    server: &mut Server,
    path: &str,
    content_type: &str,
    body: &[u8],
) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(body)
        .create_async()
        .await
}

/// Creates one endpoint serving the same body for every path matching `pattern`
#[allow(dead_code)]
pub async fn create_pattern_mock(
    server: &mut Server,
    pattern: &str,
    content_type: &str,
    body: &[u8],
) -> Mock {
    server
        .mock("GET", Matcher::Regex(pattern.to_string()))
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(body)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// An HTTP-backed orchestrator whose failures are collected for inspection
#[allow(dead_code)]
pub fn collecting_antidote(config: CureConfig) -> (Antidote<HttpFetcher>, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let antidote = Antidote::with_config(config).with_reporter(reporter.clone());
    (antidote, reporter)
}

/// Count non-overlapping occurrences of `needle`
#[allow(dead_code)]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Sample PNG-like bytes; only the base64 round trip matters
#[allow(dead_code)]
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
