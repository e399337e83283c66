//! Encrypted record file
//!
//! The file holds one sealed snapshot (see `rc_core::services::encryption`).
//! A missing file is created with an encrypted empty snapshot on first load.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rc_core::domain::entities::Record;
use rc_core::errors::StoreError;
use rc_core::repositories::RecordRepository;
use rc_core::services::encryption::SnapshotCipher;
use rc_shared::StoreConfig;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::atomic::write_atomic;

/// Record repository backed by a single AES-256-GCM encrypted file
pub struct EncryptedFileRecordRepository {
    path: PathBuf,
    cipher: SnapshotCipher,
    // Serializes writes with first-load initialization
    write_lock: Mutex<()>,
}

impl EncryptedFileRecordRepository {
    pub fn new(path: impl Into<PathBuf>, key: &[u8; 32]) -> Self {
        Self {
            path: path.into(),
            cipher: SnapshotCipher::new(key),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.records_path, &config.encryption_key)
    }

    /// Open the store, creating an empty one if the file does not exist, and
    /// check that the existing file can be decrypted with this key
    pub async fn open(path: impl Into<PathBuf>, key: &[u8; 32]) -> Result<Self, StoreError> {
        let repository = Self::new(path, key);
        let records = repository.load().await?;
        info!(
            path = %repository.path.display(),
            records = records.len(),
            event = "record_store_opened",
            "Record store opened"
        );
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn initialize(&self) -> Result<Vec<Record>, StoreError> {
        let _lock = self.write_lock.lock().await;

        // A save may have created the file while we waited
        match fs::read_to_string(&self.path).await {
            Ok(blob) => return self.cipher.open_records(&blob),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(read_error(&self.path, e)),
        }

        let blob = self.cipher.seal_records(&[])?;
        write_atomic(&self.path, blob.as_bytes())
            .await
            .map_err(|e| StoreError::write(e.to_string()))?;

        info!(
            path = %self.path.display(),
            event = "record_store_initialized",
            "Created empty encrypted record store"
        );
        Ok(Vec::new())
    }
}

#[async_trait]
impl RecordRepository for EncryptedFileRecordRepository {
    async fn load(&self) -> Result<Vec<Record>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(blob) => {
                let records = self.cipher.open_records(&blob)?;
                debug!(records = records.len(), "Loaded record snapshot");
                Ok(records)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => self.initialize().await,
            Err(e) => Err(read_error(&self.path, e)),
        }
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let blob = self.cipher.seal_records(records)?;

        let _lock = self.write_lock.lock().await;
        write_atomic(&self.path, blob.as_bytes())
            .await
            .map_err(|e| StoreError::write(e.to_string()))?;

        debug!(records = records.len(), "Saved record snapshot");
        Ok(())
    }
}

fn read_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::corrupt(format!("cannot read {}: {}", path.display(), e))
}
