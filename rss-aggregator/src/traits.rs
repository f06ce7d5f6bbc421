use crate::types::Result;
use async_trait::async_trait;

/// Trait for pulling raw documents from the network.
///
/// The pipeline only ever needs two kinds of documents: the feed itself and
/// the page an entry links to. Keeping both behind one seam lets the whole
/// pipeline run against canned documents.
#[async_trait]
pub trait FetchText: Send + Sync {
    /// Fetch a feed document. Errors mean the feed is skipped.
    async fn fetch_feed(&self, url: &str) -> Result<String>;

    /// Fetch an article page. Callers degrade errors to empty content.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
