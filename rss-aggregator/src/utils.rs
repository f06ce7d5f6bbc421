/// Text processing utilities
pub mod text {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

    /// Remove the characters that would break the batch layout.
    pub fn normalize_field(value: &str) -> String {
        value.chars().filter(|c| !matches!(c, '\n' | '\r' | '|')).collect()
    }

    /// Collapse runs of two or more whitespace characters into one space.
    pub fn collapse_whitespace(text: &str) -> String {
        MULTI_WHITESPACE.replace_all(text, " ").into_owned()
    }

    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// Keep the first `max_chars` characters and mark the cut with "...".
    pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None if char_len(text) == max_chars => format!("{}...", text),
            None => text.to_string(),
        }
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Extract host from URL
    pub fn extract_host(url_str: &str) -> Option<String> {
        Url::parse(url_str).ok()?.host_str().map(|h| h.to_ascii_lowercase())
    }

    /// True when `host` is `domain` or one of its subdomains.
    pub fn host_matches(host: &str, domain: &str) -> bool {
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    pub fn is_valid_http_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}
