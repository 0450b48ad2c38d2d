//! Activity record model, one row of the persisted activity log.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Seconds east of UTC for India Standard Time.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// A photo-backed activity entry. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityRecord {
    pub username: String,
    pub timestamp: String,
    pub description: String,
    pub image_file: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Raw image bytes captured by the upload form.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl CapturedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

/// The fixed civil time zone used for every activity timestamp.
pub fn ist() -> FixedOffset {
    // Constant offset is always within range.
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current wall-clock time in India Standard Time.
pub fn now_ist() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&ist())
}

/// `YYYYMMDD_HHMMSS`, used in photo file names.
pub fn compact_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// `YYYY-MM-DD HH:MM:SS`, stored in the log.
pub fn display_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// File name for a photo taken by `username` at `at`.
pub fn photo_file_name(username: &str, at: &DateTime<FixedOffset>) -> String {
    format!("{}_activity_{}.jpg", username, compact_timestamp(at))
}
