use crate::sources::LinkRule;

const COMMUNITY_PREFIX: &str = "/community/";
const COMMUNITY_BASE: &str = "https://community.rapid7.com";

/// Rapid7 feeds publish community posts as site-relative `/community/...` paths.
pub struct Rapid7CommunityLinks;

impl LinkRule for Rapid7CommunityLinks {
    fn domain(&self) -> &str {
        "rapid7.com"
    }

    fn repair(&self, link: &str) -> Option<String> {
        link.starts_with(COMMUNITY_PREFIX)
            .then(|| format!("{}{}", COMMUNITY_BASE, link))
    }
}
