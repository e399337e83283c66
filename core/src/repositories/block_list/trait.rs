//! Persistence seam for origin blocks.

use async_trait::async_trait;

use crate::domain::entities::BlockList;
use crate::errors::StoreError;

/// Repository trait for the persisted block list (`origin -> blocked_until`)
///
/// Only the origin guard writes through this trait; it always saves the full
/// map, with expired entries already pruned.
#[async_trait]
pub trait BlockListRepository: Send + Sync {
    /// Load all persisted blocks, including ones that may have expired since
    async fn load(&self) -> Result<BlockList, StoreError>;

    /// Replace the persisted block list
    async fn save(&self, blocks: &BlockList) -> Result<(), StoreError>;
}
