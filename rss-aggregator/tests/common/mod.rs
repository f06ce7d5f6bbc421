#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use interfaces::{Delivery, OutputBatch};
use rss_aggregator::{AggregatorError, AppConfig, FetchText, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Serves canned feed and page documents keyed by URL.
#[derive(Default)]
pub struct StubFetcher {
    feeds: HashMap<String, String>,
    pages: HashMap<String, String>,
    page_calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, body: impl Into<String>) -> Self {
        self.feeds.insert(url.to_string(), body.into());
        self
    }

    pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub fn page_calls(&self) -> Vec<String> {
        self.page_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchText for StubFetcher {
    async fn fetch_feed(&self, url: &str) -> Result<String> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| AggregatorError::General(format!("HTTP 404 Not Found: {}", url)))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.page_calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AggregatorError::General(format!("HTTP 404 Not Found: {}", url)))
    }
}

/// Records every batch handed to it; optionally fails.
#[derive(Default)]
pub struct RecordingDelivery {
    pub batches: Mutex<Vec<OutputBatch>>,
    pub fail: bool,
}

impl RecordingDelivery {
    pub fn failing() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<OutputBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    fn channel_name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, batch: &OutputBatch) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp connection refused");
        }
        self.batches.lock().unwrap().push(batch.clone());
        Ok(())
    }
}

pub struct Item {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub description: String,
}

pub fn item(title: &str, link: &str, date: NaiveDate, description: &str) -> Item {
    Item {
        title: title.to_string(),
        link: link.to_string(),
        published: date.and_hms_opt(9, 30, 0).unwrap().and_utc(),
        description: description.to_string(),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Minimal RSS 2.0 document with the given items.
pub fn rss(items: &[Item]) -> String {
    let body: String = items
        .iter()
        .map(|i| {
            format!(
                "<item><title>{}</title><link>{}</link><pubDate>{}</pubDate><description>{}</description></item>",
                escape(&i.title),
                escape(&i.link),
                i.published.to_rfc2822(),
                escape(&i.description)
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <rss version=\"2.0\"><channel><title>Security feed</title>\
         <link>https://blog.example.com/</link><description>test</description>{}</channel></rss>",
        body
    )
}

/// Text of roughly `words` words, long enough to clear content thresholds.
pub fn long_text(topic: &str, words: usize) -> String {
    (0..words)
        .map(|i| format!("{}{}", topic, i % 7))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Configuration for tests: webhook channel, no AI key, no pacing.
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut env: HashMap<String, String> = HashMap::from([
        ("EXPL_DELIVERY".to_string(), "webhook".to_string()),
        ("EXPL_WEBHOOK_URL".to_string(), "https://hooks.example.com/digest".to_string()),
        ("EXPL_FEED_DELAY_SECS".to_string(), "0".to_string()),
        ("EXPL_OVERALL_SUMMARY".to_string(), "false".to_string()),
    ]);
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }
    AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

/// Answer a single HTTP request with a canned response.
///
/// Returns the base URL to point a client at and a handle that yields the raw
/// request (headers and body) once it has been served.
pub async fn serve_once(status: &'static str, body: impl Into<String>) -> (String, JoinHandle<String>) {
    let body = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Body part of a raw HTTP request.
pub fn request_body(request: &str) -> &str {
    request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or_default()
}
