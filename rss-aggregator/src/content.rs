use crate::traits::FetchText;
use crate::utils::text::{char_len, collapse_whitespace, truncate_with_ellipsis};
use interfaces::FeedEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());

/// Subtrees whose text never counts as article content.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside", "noscript", "form"];

/// Containers tried in order when looking for the article body.
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=main]",
    "#content",
    ".post-content",
    ".entry-content",
    ".content",
    "body",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    /// Summarize the summary field shipped in the feed.
    FeedSummary,
    /// Fetch the linked page and summarize its text.
    PageFetch,
}

impl FromStr for ContentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feed" => Ok(ContentMode::FeedSummary),
            "page" => Ok(ContentMode::PageFetch),
            other => Err(format!("unknown content mode '{}', expected 'feed' or 'page'", other)),
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMode::FeedSummary => write!(f, "feed"),
            ContentMode::PageFetch => write!(f, "page"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    /// Cleaned feed summary, cut to the threshold length.
    pub local_summary: String,
    /// Text to hand to the summarizer, if any was worth sending.
    pub summarizer_input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedContent),
    Discarded(String),
}

pub struct ContentResolver {
    mode: ContentMode,
    min_chars: usize,
}

impl ContentResolver {
    pub fn new(mode: ContentMode, min_chars: usize) -> Self {
        Self { mode, min_chars }
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub async fn resolve(&self, fetcher: &dyn FetchText, entry: &FeedEntry) -> Resolution {
        let cleaned = clean_feed_summary(&entry.raw_summary);
        let local_summary = if char_len(&cleaned) >= self.min_chars {
            truncate_with_ellipsis(&cleaned, self.min_chars)
        } else {
            cleaned.clone()
        };

        let summarizer_input = match self.mode {
            ContentMode::FeedSummary => {
                if char_len(&cleaned) < self.min_chars {
                    return Resolution::Discarded(format!(
                        "feed summary has {} characters, need {}",
                        char_len(&cleaned),
                        self.min_chars
                    ));
                }
                Some(cleaned)
            }
            ContentMode::PageFetch => {
                let text = fetch_page_text(fetcher, &entry.link).await;
                if char_len(&text) < self.min_chars {
                    debug!(url = %entry.link, "Page text too short for summarization");
                    None
                } else {
                    Some(text)
                }
            }
        };

        Resolution::Resolved(ResolvedContent {
            local_summary,
            summarizer_input,
        })
    }
}

/// Strip markup from a feed summary and squeeze its whitespace.
pub fn clean_feed_summary(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, "");
    collapse_whitespace(&stripped).trim().to_string()
}

/// Fetch a page and reduce it to its readable text. Failures yield "".
pub async fn fetch_page_text(fetcher: &dyn FetchText, url: &str) -> String {
    match fetcher.fetch_page(url).await {
        Ok(html) => extract_main_text(&html),
        Err(e) => {
            warn!(url = %url, "Page fetch failed: {}", e);
            String::new()
        }
    }
}

/// Visible text of the most article-like container in an HTML document.
pub fn extract_main_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector).filter(|el| !in_excluded_subtree(*el)) {
            let text = visible_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }

    visible_text(document.root_element())
}

/// True when the element sits inside a nav, header, aside or similar block.
fn in_excluded_subtree(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| EXCLUDED_TAGS.contains(&ancestor.value().name()))
}

fn visible_text(element: ElementRef) -> String {
    if EXCLUDED_TAGS.contains(&element.value().name()) {
        return String::new();
    }

    let parts: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != element.id())
                .filter_map(ElementRef::wrap)
                .any(|ancestor| EXCLUDED_TAGS.contains(&ancestor.value().name()));
            if hidden {
                None
            } else {
                Some(&**text)
            }
        })
        .collect();

    collapse_whitespace(&parts.join(" ")).trim().to_string()
}
