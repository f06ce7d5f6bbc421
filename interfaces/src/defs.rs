use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::OutputBatch;

/// One entry of a syndication feed after selection and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub raw_summary: String,
}

impl FeedEntry {
    /// Calendar date the entry was published on (UTC).
    pub fn published_date(&self) -> NaiveDate {
        self.published.date_naive()
    }
}

/// Formatted block for one accepted entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFragment {
    pub link: String,
    pub title: String,
    pub published: String,
    pub summary: String,
}

// Object style note:
// Delivery implementations run once per process invocation and hold only
// their transport configuration. They never keep state between runs.

#[async_trait]
pub trait Delivery: Send + Sync {
    /// Short name of the channel, used in logs.
    fn channel_name(&self) -> &'static str;

    /// Send one batch. Failures are reported to the caller, never retried here.
    async fn deliver(&self, batch: &OutputBatch) -> anyhow::Result<()>;
}
