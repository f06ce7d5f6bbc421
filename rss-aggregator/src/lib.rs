pub mod aggregator;
pub mod artifact;
pub mod config;
pub mod content;
pub mod digest;
pub mod feed_list;
pub mod fetcher;
pub mod filter;
pub mod llm_adapter;
pub mod parser;
pub mod selector;
pub mod sources;
pub mod traits;
pub mod types;
pub mod utils;

pub use aggregator::{DigestRun, RssAggregator};
pub use config::{AppConfig, ConfigError};
pub use content::{ContentMode, ContentResolver, Resolution, ResolvedContent};
pub use feed_list::{load_feed_list, parse_feed_list};
pub use fetcher::Fetcher;
pub use filter::{RelevanceFilter, SeenTitles, Verdict};
pub use llm_adapter::{DisabledSummarizer, GeminiAdapter, GeminiConfig, MockSummarizer, Summarizer, SummaryOutcome};
pub use parser::FeedParser;
pub use selector::{EntrySelector, ReferenceWindow, SelectOutcome, SkipReason};
pub use sources::{LinkRule, LinkRules};
pub use traits::FetchText;
pub use types::*;
