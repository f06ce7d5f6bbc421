use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SUMMARY_PROMPT: &str = "Please summarize the following content. Ignore the html tags. \
If the content is not about security vulnerabilities, exploits or attacks, reply with exactly N/A.\n";

/// Reply the model gives for content outside the digest's topic.
pub const NOT_RELEVANT_MARKER: &str = "N/A";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summary(String),
    NotRelevant,
    Failed(String),
}

/// Trait for services that condense article text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn adapter_name(&self) -> String;

    /// Never errors: transport and API problems come back as `Failed`.
    async fn summarize(&self, text: &str) -> SummaryOutcome;
}

/// Map a raw model reply onto an outcome.
pub fn classify_reply(reply: &str) -> SummaryOutcome {
    let trimmed = reply.trim();
    if trimmed.eq_ignore_ascii_case(NOT_RELEVANT_MARKER) {
        SummaryOutcome::NotRelevant
    } else {
        SummaryOutcome::Summary(trimmed.to_string())
    }
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_seconds: 35,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Summarizer backed by the Gemini `generateContent` endpoint.
pub struct GeminiAdapter {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAdapter {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, text: &str) -> std::result::Result<String, String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: format!("{}{}", SUMMARY_PROMPT, text),
                }],
            }],
        };

        // The key travels as a query parameter; keep it out of logs and errors.
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini API returned error");
            return Err(format!("HTTP {}: {}", status.as_u16(), body));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Gemini response: {}", e.without_url()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| "Gemini response had no candidates".to_string())
    }
}

#[async_trait]
impl Summarizer for GeminiAdapter {
    fn adapter_name(&self) -> String {
        format!("Gemini ({})", self.config.model)
    }

    async fn summarize(&self, text: &str) -> SummaryOutcome {
        info!(input_chars = text.chars().count(), "Requesting Gemini summary");
        match self.generate(text).await {
            Ok(reply) => {
                debug!(reply_chars = reply.chars().count(), "Received Gemini reply");
                classify_reply(&reply)
            }
            Err(e) => {
                warn!("Gemini summarization failed: {}", e);
                SummaryOutcome::Failed(e)
            }
        }
    }
}

/// Stand-in used when no API key is configured.
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    fn adapter_name(&self) -> String {
        "Disabled".to_string()
    }

    async fn summarize(&self, _text: &str) -> SummaryOutcome {
        SummaryOutcome::Failed("summarizer disabled".to_string())
    }
}

/// Summarizer with scripted replies for tests and dry runs.
///
/// Outcomes queued with [`MockSummarizer::push`] are returned in order; once
/// the queue is empty every call gets the fallback outcome.
pub struct MockSummarizer {
    scripted: Mutex<VecDeque<SummaryOutcome>>,
    fallback: SummaryOutcome,
    calls: Mutex<Vec<String>>,
}

impl MockSummarizer {
    pub fn new(fallback: SummaryOutcome) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(self, outcome: SummaryOutcome) -> Self {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.push_back(outcome);
        }
        self
    }

    /// Inputs received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new(SummaryOutcome::Failed("mock summarizer has no scripted reply".to_string()))
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    fn adapter_name(&self) -> String {
        "Mock".to_string()
    }

    async fn summarize(&self, text: &str) -> SummaryOutcome {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }
        self.scripted
            .lock()
            .ok()
            .and_then(|mut scripted| scripted.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
