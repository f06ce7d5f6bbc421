mod common;

use common::{init_tracing, serve_once};
use rss_aggregator::{AggregatorError, FetchConfig, Fetcher, DEFAULT_USER_AGENT};
use tracing::info;

#[tokio::test]
async fn page_fetch_sends_user_agent_and_returns_body() {
    init_tracing();
    let (base_url, server) = serve_once("200 OK", "<html><body>advisory</body></html>").await;
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

    let body = fetcher.fetch_page(&format!("{}/post", base_url)).await.unwrap();
    assert_eq!(body, "<html><body>advisory</body></html>");

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.contains(&format!("user-agent: {}", DEFAULT_USER_AGENT.to_ascii_lowercase())));
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    init_tracing();
    let (base_url, _server) = serve_once("200 OK", "x".repeat(64)).await;
    let config = FetchConfig {
        max_page_size_mb: 0,
        ..Default::default()
    };
    let fetcher = Fetcher::new(config).unwrap();

    let err = fetcher.fetch_page(&base_url).await.unwrap_err();
    info!("Rejected page: {}", err);
    assert!(matches!(
        err,
        AggregatorError::TooLarge {
            size_bytes: 64,
            limit_mb: 0
        }
    ));
}

#[tokio::test]
async fn oversized_feed_is_rejected() {
    init_tracing();
    let (base_url, _server) = serve_once("200 OK", "<rss/>").await;
    let config = FetchConfig {
        max_feed_size_mb: 0,
        ..Default::default()
    };
    let fetcher = Fetcher::new(config).unwrap();

    let err = fetcher.fetch_feed(&base_url).await.unwrap_err();
    assert!(matches!(err, AggregatorError::TooLarge { size_bytes: 6, .. }));
}

#[tokio::test]
async fn error_status_is_not_returned_as_content() {
    init_tracing();
    let (base_url, _server) = serve_once("404 Not Found", "missing").await;
    let fetcher = Fetcher::new(FetchConfig::default()).unwrap();

    let err = fetcher.fetch_feed(&base_url).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}
