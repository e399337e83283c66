//! JSON block-list file
//!
//! The file is a flat JSON object mapping each blocked origin to the RFC 3339
//! instant its block ends, e.g. `{"203.0.113.7":"2024-05-01T12:00:00.000Z"}`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rc_core::domain::entities::BlockList;
use rc_core::errors::StoreError;
use rc_core::repositories::BlockListRepository;
use rc_shared::StoreConfig;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use super::atomic::write_atomic;

pub struct JsonBlockListRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonBlockListRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.block_list_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, blocks: &BlockList) -> Result<(), StoreError> {
        // Sorted keys keep the file stable between writes
        let ordered: BTreeMap<&String, &DateTime<Utc>> = blocks.iter().collect();
        let json = serde_json::to_string(&ordered)
            .map_err(|e| StoreError::write(format!("cannot encode block list: {}", e)))?;

        write_atomic(&self.path, json.as_bytes())
            .await
            .map_err(|e| StoreError::write(e.to_string()))
    }
}

#[async_trait]
impl BlockListRepository for JsonBlockListRepository {
    async fn load(&self) -> Result<BlockList, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let _lock = self.write_lock.lock().await;
                if fs::try_exists(&self.path).await.unwrap_or(false) {
                    fs::read_to_string(&self.path)
                        .await
                        .map_err(|e| read_error(&self.path, e))?
                } else {
                    self.write(&BlockList::new()).await?;
                    info!(
                        path = %self.path.display(),
                        event = "block_list_initialized",
                        "Created empty block list"
                    );
                    return Ok(BlockList::new());
                }
            }
            Err(e) => return Err(read_error(&self.path, e)),
        };

        if text.trim().is_empty() {
            return Ok(BlockList::new());
        }
        serde_json::from_str(&text)
            .map_err(|e| StoreError::corrupt(format!("invalid block list JSON: {}", e)))
    }

    async fn save(&self, blocks: &BlockList) -> Result<(), StoreError> {
        let _lock = self.write_lock.lock().await;
        self.write(blocks).await
    }
}

fn read_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::corrupt(format!("cannot read {}: {}", path.display(), e))
}
