use chrono::{DateTime, Utc};

/// Desktop browser identity used for every outbound request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub feed_timeout_seconds: u64,
    pub page_timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_page_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            feed_timeout_seconds: 30,
            page_timeout_seconds: 5,
            max_feed_size_mb: 10,
            max_page_size_mb: 5,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub feeds_total: usize,
    pub feeds_skipped: usize,
    pub entries_selected: usize,
    pub entries_ignored: usize,
    pub entries_duplicate: usize,
    pub entries_discarded: usize,
    pub fragments: usize,
    pub delivered: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Response of {size_bytes} bytes exceeds the {limit_mb}MB limit")]
    TooLarge { size_bytes: u64, limit_mb: usize },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
