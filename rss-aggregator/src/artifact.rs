use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub const DEBUG_FILE_NAME: &str = "news.html";

/// Write a copy of the rendered batch for inspection. Errors are only logged.
pub async fn save_debug_copy(path: &Path, html: &str) -> bool {
    match fs::write(path, html).await {
        Ok(()) => {
            info!("Saved debug copy to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to save debug copy to {}: {}", path.display(), e);
            false
        }
    }
}
