use crate::traits::FetchText;
use crate::types::{AggregatorError, FetchConfig, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct Fetcher {
    feed_client: Client,
    page_client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let feed_client = Self::build_client(&config, config.feed_timeout_seconds)?;
        let page_client = Self::build_client(&config, config.page_timeout_seconds)?;

        Ok(Self {
            feed_client,
            page_client,
            config,
        })
    }

    fn build_client(config: &FetchConfig, timeout_seconds: u64) -> Result<Client> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(client)
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let response = self.feed_client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        check_size(&response, self.config.max_feed_size_mb)?;

        let content = response.text().await?;
        info!(
            "Fetched feed: {} ({} bytes in {} ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching page content from: {}", url);

        let response = self.page_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AggregatorError::General(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        check_size(&response, self.config.max_page_size_mb)?;

        let content = response.text().await?;
        Ok(content)
    }
}

/// Reject bodies whose declared length is over `limit_mb`.
fn check_size(response: &Response, limit_mb: usize) -> Result<()> {
    if let Some(size_bytes) = response.content_length() {
        if size_bytes > (limit_mb as u64) * 1024 * 1024 {
            return Err(AggregatorError::TooLarge { size_bytes, limit_mb });
        }
    }
    Ok(())
}

#[async_trait]
impl FetchText for Fetcher {
    async fn fetch_feed(&self, url: &str) -> Result<String> {
        Fetcher::fetch_feed(self, url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        Fetcher::fetch_page(self, url).await
    }
}
