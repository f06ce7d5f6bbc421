pub mod rapid7;

pub use rapid7::Rapid7CommunityLinks;

use crate::utils::url::{extract_host, host_matches};
use tracing::debug;
use url::Url;

/// Site-specific repair for links a feed publishes in a broken form.
pub trait LinkRule: Send + Sync {
    /// Feed domain the rule applies to (subdomains included).
    fn domain(&self) -> &str;

    /// Return the repaired link, or `None` when the rule does not apply.
    fn repair(&self, link: &str) -> Option<String>;
}

/// Rewrites links starting with `prefix` by prepending `base`.
pub struct PrefixRule {
    domain: String,
    prefix: String,
    base: String,
}

impl PrefixRule {
    pub fn new(domain: impl Into<String>, prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            prefix: prefix.into(),
            base: base.into(),
        }
    }
}

impl LinkRule for PrefixRule {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn repair(&self, link: &str) -> Option<String> {
        link.starts_with(&self.prefix).then(|| format!("{}{}", self.base, link))
    }
}

/// Rule set keyed by feed domain.
pub struct LinkRules {
    rules: Vec<Box<dyn LinkRule>>,
}

impl LinkRules {
    /// A rule set without any site rules; only relative links get resolved.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl LinkRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the first matching rule for the feed's domain, then resolve
    /// whatever is still relative against the feed URL.
    pub fn repair(&self, feed_url: &str, link: &str) -> String {
        if let Some(host) = extract_host(feed_url) {
            for rule in self.rules.iter().filter(|r| host_matches(&host, r.domain())) {
                if let Some(fixed) = rule.repair(link) {
                    debug!("Repaired link {} -> {}", link, fixed);
                    return fixed;
                }
            }
        }

        if matches!(Url::parse(link), Err(url::ParseError::RelativeUrlWithoutBase)) {
            if let Ok(resolved) = Url::parse(feed_url).and_then(|base| base.join(link)) {
                return resolved.to_string();
            }
        }

        link.to_string()
    }
}

impl Default for LinkRules {
    fn default() -> Self {
        Self::empty().with_rule(Rapid7CommunityLinks)
    }
}
