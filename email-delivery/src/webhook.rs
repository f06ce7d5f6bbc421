use crate::error::DeliveryError;
use async_trait::async_trait;
use interfaces::{Delivery, OutputBatch};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Message field limit of the webhook endpoint, kept below the hard 2000 cap.
pub const MAX_CONTENT_CHARS: usize = 1990;

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
}

impl WebhookPayload {
    pub fn from_text(text: &str) -> Self {
        Self {
            content: truncate_content(text, MAX_CONTENT_CHARS),
        }
    }
}

/// Cut `text` to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

pub struct WebhookDelivery {
    client: Client,
    url: Url,
}

impl WebhookDelivery {
    pub fn new(config: WebhookConfig) -> Result<Self, DeliveryError> {
        let url = Url::parse(&config.url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, url })
    }

    pub async fn post(&self, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let resp = self.client.post(self.url.clone()).json(payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Webhook returned an error");
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!(chars = payload.content.chars().count(), "Posted webhook message");
        Ok(())
    }
}

#[async_trait]
impl Delivery for WebhookDelivery {
    fn channel_name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, batch: &OutputBatch) -> anyhow::Result<()> {
        let payload = WebhookPayload::from_text(&batch.render_text());
        self.post(&payload).await?;
        Ok(())
    }
}
