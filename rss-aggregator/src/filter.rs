use std::collections::HashSet;
use tracing::debug;

/// Title keywords that mark an entry as noise for an exploit digest.
pub const DEFAULT_IGNORE_TITLES: &[&str] = &[
    "[dos]",
    "Threat Intelligence Bulletin",
    "Cyber Security Webinar",
    "Security Update Review",
    "cyberinsurance",
    "A week in security",
    "Survey:",
];

/// Titles accepted so far in the current run.
#[derive(Debug, Default)]
pub struct SeenTitles {
    titles: HashSet<String>,
}

impl SeenTitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    fn insert(&mut self, title: &str) -> bool {
        self.titles.insert(title.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Ignored { keyword: String },
    Duplicate,
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Decide whether a title goes further down the pipeline.
    ///
    /// Accepted titles are recorded in `seen`, so a second call with the same
    /// title reports a duplicate.
    pub fn check(&self, title: &str, seen: &mut SeenTitles) -> Verdict {
        let lowered = title.to_lowercase();
        if let Some(keyword) = self.keywords.iter().find(|k| lowered.contains(k.as_str())) {
            debug!("Ignoring '{}' (matched '{}')", title, keyword);
            return Verdict::Ignored {
                keyword: keyword.clone(),
            };
        }

        if !seen.insert(title) {
            debug!("Duplicate title '{}'", title);
            return Verdict::Duplicate;
        }

        Verdict::Accept
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_TITLES)
    }
}
