use crate::parser::FeedParser;
use crate::sources::LinkRules;
use crate::traits::FetchText;
use crate::utils::text::normalize_field;
use chrono::{Datelike, NaiveDate};
use interfaces::FeedEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, info, warn};

static REFERENCE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d+)-(\d+)").unwrap());

const MIN_URL_LEN: usize = 7;
const MIN_DATE_LEN: usize = 8;

/// Trailing inclusion window anchored on the run's reference date.
///
/// An entry is inside the window when it shares the reference year and month
/// and its day-of-month is at most three days before the reference day. The
/// window never reaches back into the previous month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceWindow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ReferenceWindow {
    pub const TRAILING_DAYS: i64 = 3;

    /// Parse a `YYYY-MM-DD` string. Single-digit month and day are accepted.
    pub fn parse(reference_date: &str) -> Option<Self> {
        if reference_date.len() < MIN_DATE_LEN {
            return None;
        }
        let caps = REFERENCE_DATE.captures(reference_date)?;
        Some(Self {
            year: caps[1].parse().ok()?,
            month: caps[2].parse().ok()?,
            day: caps[3].parse().ok()?,
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
            && date.month() == self.month
            && i64::from(date.day()) >= i64::from(self.day) - Self::TRAILING_DAYS
    }
}

impl fmt::Display for ReferenceWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("feed URL is too short to be valid")]
    InvalidUrl,
    #[error("reference date could not be parsed")]
    InvalidReferenceDate,
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Selected(Vec<FeedEntry>),
    Skipped(SkipReason),
}

impl SelectOutcome {
    pub fn entries(&self) -> &[FeedEntry] {
        match self {
            SelectOutcome::Selected(entries) => entries,
            SelectOutcome::Skipped(_) => &[],
        }
    }
}

pub struct EntrySelector {
    link_rules: LinkRules,
}

impl EntrySelector {
    pub fn new(link_rules: LinkRules) -> Self {
        Self { link_rules }
    }

    /// Fetch one feed and keep the entries inside the reference window.
    pub async fn select(&self, fetcher: &dyn FetchText, url: &str, reference_date: &str) -> SelectOutcome {
        if url.len() < MIN_URL_LEN {
            return SelectOutcome::Skipped(SkipReason::InvalidUrl);
        }
        let Some(window) = ReferenceWindow::parse(reference_date) else {
            return SelectOutcome::Skipped(SkipReason::InvalidReferenceDate);
        };

        info!("Get feed {}", url);
        let content = match fetcher.fetch_feed(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!(url = %url, "Feed fetch failed: {}", e);
                return SelectOutcome::Skipped(SkipReason::Fetch(e.to_string()));
            }
        };

        self.select_from_document(url, &content, &window)
    }

    /// Selection over an already fetched feed document.
    pub fn select_from_document(&self, url: &str, content: &str, window: &ReferenceWindow) -> SelectOutcome {
        let parsed = match FeedParser::parse_feed(content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url = %url, "Feed parse failed: {}", e);
                return SelectOutcome::Skipped(SkipReason::Parse(e.to_string()));
            }
        };

        let total = parsed.entries.len();
        let entries: Vec<FeedEntry> = parsed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let Some(published) = entry.published_at else {
                    debug!("Skipping entry without a published date: {}", entry.title);
                    return None;
                };
                let link = normalize_field(&entry.url);
                Some(FeedEntry {
                    title: normalize_field(&entry.title),
                    link: self.link_rules.repair(url, &link),
                    published,
                    raw_summary: normalize_field(entry.summary.as_deref().unwrap_or_default()),
                })
            })
            .filter(|entry| window.contains(entry.published_date()))
            .collect();

        debug!(url = %url, "{} of {} entries inside window {}", entries.len(), total, window);
        SelectOutcome::Selected(entries)
    }
}

impl Default for EntrySelector {
    fn default() -> Self {
        Self::new(LinkRules::default())
    }
}
