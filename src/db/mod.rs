//! Persistence for activity photos and the activity log.
//!
//! The CSV log on disk is the source of truth shared by every session.

mod activity_log;

pub use activity_log::*;

use std::path::Path;

/// Open the activity store, creating the photo directory and log parent directory.
pub async fn init_store(log_path: &Path, photos_dir: &Path) -> Result<ActivityStore, std::io::Error> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::create_dir_all(photos_dir).await?;

    Ok(ActivityStore::new(log_path, photos_dir))
}
