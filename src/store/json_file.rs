//! JSON-file backend: all records in one pretty-printed array.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::screening::CandidateRecord;

use super::traits::CandidateStore;

/// Stores screenings in a JSON file. Writes are serialized through a mutex.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. A missing or blank file is an empty store.
    async fn read_all(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Data file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn write_all(&self, records: &[CandidateRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        // Replace the data file via rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CandidateStore for JsonFileStore {
    async fn exists(&self, email: &str, phone: &str) -> Result<bool, StoreError> {
        let records = self.read_all().await?;
        Ok(records.iter().any(|r| r.matches(email, phone)))
    }

    async fn save(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        if records
            .iter()
            .any(|r| r.matches(record.email(), record.phone()))
        {
            warn!(record_id = %record.id, "Rejected duplicate candidate");
            return Err(StoreError::Duplicate {
                email: record.email().to_string(),
            });
        }

        records.push(record.clone());
        self.write_all(&records).await?;
        info!(
            record_id = %record.id,
            total = records.len(),
            path = %self.path.display(),
            "Candidate record saved"
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        self.read_all().await
    }
}
