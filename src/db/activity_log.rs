//! Append-only activity log backed by a CSV file, plus the photo directory.
//!
//! Appends are serialized through a mutex so rows from concurrent sessions never interleave.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::ActivityRecord;

/// Directory prefix recorded in `ImageFile`, relative to the data root.
pub const PHOTOS_PREFIX: &str = "photos";

/// Activity store for photo files and log rows.
#[derive(Debug)]
pub struct ActivityStore {
    log_path: PathBuf,
    photos_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ActivityStore {
    pub fn new(log_path: impl Into<PathBuf>, photos_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            photos_dir: photos_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn photos_dir(&self) -> &Path {
        &self.photos_dir
    }

    /// Read every record in the log. A missing log is an empty log.
    pub async fn load(&self) -> Result<Vec<ActivityRecord>, AppError> {
        let bytes = match tokio::fs::read(&self.log_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let records = reader
            .deserialize::<ActivityRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Loaded {} activity records from {:?}",
            records.len(),
            self.log_path
        );
        Ok(records)
    }

    /// Write photo bytes under `file_name` and return the path recorded in the log.
    pub async fn save_photo(&self, file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.photos_dir).await?;
        let path = self.photos_dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Saved photo {:?} ({} bytes)", path, bytes.len());
        Ok(format!("{}/{}", PHOTOS_PREFIX, file_name))
    }

    /// Append one row and return the full log as it stands right after the write.
    ///
    /// The reload happens under the write lock, so the returned table contains this row
    /// and every row other sessions appended before it.
    pub async fn append_and_reload(
        &self,
        record: &ActivityRecord,
    ) -> Result<Vec<ActivityRecord>, AppError> {
        let _guard = self.write_lock.lock().await;
        self.write_row(record).await?;
        self.load().await
    }

    /// Append one row, writing the header first when the log is new or empty.
    async fn write_row(&self, record: &ActivityRecord) -> Result<(), AppError> {
        let needs_header = match tokio::fs::metadata(&self.log_path).await {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let row = encode_row(record, needs_header)?;

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await?;
        file.write_all(&row).await?;
        file.sync_data().await?;

        Ok(())
    }
}

/// Serialize one record as CSV, optionally preceded by the header line.
fn encode_row(record: &ActivityRecord, with_header: bool) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());
    writer.serialize(record)?;
    writer
        .into_inner()
        .map_err(|e| AppError::Storage(format!("Failed to encode activity row: {}", e)))
}
