use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// Lines shorter than this cannot hold a usable feed URL.
pub const MIN_FEED_LINE_LEN: usize = 11;

/// Feed URLs from the text of a feed list, in file order.
///
/// Line breaks are stripped; lines containing `#` or shorter than
/// [`MIN_FEED_LINE_LEN`] characters are skipped.
pub fn parse_feed_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.replace(['\n', '\r'], ""))
        .filter(|line| !line.contains('#') && line.chars().count() >= MIN_FEED_LINE_LEN)
        .collect()
}

/// Read a feed list from disk. Problems are logged and yield no feeds.
pub fn load_feed_list(path: &Path) -> Vec<String> {
    if !path.is_file() {
        error!("Feed list {} does not exist or is not a file", path.display());
        return Vec::new();
    }

    match fs::read_to_string(path) {
        Ok(contents) => {
            let feeds = parse_feed_list(&contents);
            debug!("Loaded {} feeds from {}", feeds.len(), path.display());
            feeds
        }
        Err(e) => {
            error!("Failed to read feed list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
