//! In-memory implementation of BlockListRepository for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::BlockList;
use crate::errors::StoreError;

use super::trait_::BlockListRepository;

/// Mock block-list repository
pub struct MockBlockListRepository {
    blocks: RwLock<BlockList>,
    save_count: AtomicUsize,
    fail_save: AtomicBool,
}

impl MockBlockListRepository {
    pub fn new() -> Self {
        Self::with_blocks(BlockList::new())
    }

    pub fn with_blocks(blocks: BlockList) -> Self {
        Self {
            blocks: RwLock::new(blocks),
            save_count: AtomicUsize::new(0),
            fail_save: AtomicBool::new(false),
        }
    }

    /// Snapshot of what has been persisted
    pub async fn blocks(&self) -> BlockList {
        self.blocks.read().await.clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockBlockListRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockListRepository for MockBlockListRepository {
    async fn load(&self) -> Result<BlockList, StoreError> {
        Ok(self.blocks.read().await.clone())
    }

    async fn save(&self, blocks: &BlockList) -> Result<(), StoreError> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::write("mock block list write failure"));
        }
        *self.blocks.write().await = blocks.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
