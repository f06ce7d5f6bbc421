mod common;

use common::{init_tracing, request_body, serve_once};
use rss_aggregator::llm_adapter::SUMMARY_PROMPT;
use rss_aggregator::{GeminiAdapter, GeminiConfig, Summarizer, SummaryOutcome};
use tracing::info;

fn adapter_for(base_url: String) -> GeminiAdapter {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = base_url;
    config.timeout_seconds = 5;
    GeminiAdapter::new(config).unwrap()
}

fn reply_with(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    })
    .to_string()
}

#[tokio::test]
async fn gemini_request_shape_and_summary_extraction() {
    init_tracing();
    let (base_url, server) = serve_once("200 OK", reply_with("  Heap overflow in the parser.  ")).await;
    let adapter = adapter_for(base_url);

    let outcome = adapter.summarize("Attackers chain two bugs").await;
    assert_eq!(outcome, SummaryOutcome::Summary("Heap overflow in the parser.".to_string()));

    let request = server.await.unwrap();
    info!("Captured request:\n{}", request);
    assert!(request.starts_with("POST /models/gemini-2.0-flash:generateContent?key=test-key "));

    let body: serde_json::Value = serde_json::from_str(request_body(&request)).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "contents": [{ "parts": [{ "text": format!("{}Attackers chain two bugs", SUMMARY_PROMPT) }] }]
        })
    );
}

#[tokio::test]
async fn gemini_not_relevant_reply() {
    init_tracing();
    let (base_url, _server) = serve_once("200 OK", reply_with("N/A\n")).await;

    let outcome = adapter_for(base_url).summarize("quarterly earnings call").await;
    assert_eq!(outcome, SummaryOutcome::NotRelevant);
}

#[tokio::test]
async fn gemini_error_status_is_reported_with_body() {
    init_tracing();
    let (base_url, _server) = serve_once("503 Service Unavailable", "overloaded").await;

    let outcome = adapter_for(base_url).summarize("text").await;
    assert_eq!(outcome, SummaryOutcome::Failed("HTTP 503: overloaded".to_string()));
}

#[tokio::test]
async fn gemini_reply_without_candidates_fails() {
    init_tracing();
    let (base_url, _server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

    let outcome = adapter_for(base_url).summarize("text").await;
    assert_eq!(
        outcome,
        SummaryOutcome::Failed("Gemini response had no candidates".to_string())
    );
}

#[tokio::test]
async fn gemini_errors_do_not_leak_the_key() {
    init_tracing();
    // nothing listens on the returned port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = adapter_for(format!("http://{}", addr)).summarize("text").await;
    let SummaryOutcome::Failed(message) = outcome else {
        panic!("expected a transport failure");
    };
    info!("Transport failure: {}", message);
    assert!(!message.contains("test-key"));
}
