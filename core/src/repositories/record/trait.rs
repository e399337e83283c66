//! Record repository trait defining the persistence seam of the record store.
//!
//! The store is always read and written as a whole snapshot. Implementations
//! decide how the snapshot is encoded and protected at rest; callers that need
//! read-modify-write consistency go through
//! [`RecordLedger`](crate::services::ledger::RecordLedger), never through the
//! repository directly.

use async_trait::async_trait;

use crate::domain::entities::Record;
use crate::errors::StoreError;

/// Repository trait for the full record snapshot
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use rc_core::domain::entities::Record;
/// use rc_core::errors::StoreError;
/// use rc_core::repositories::RecordRepository;
///
/// struct InMemoryRecords {
///     // snapshot storage
/// }
///
/// #[async_trait]
/// impl RecordRepository for InMemoryRecords {
///     async fn load(&self) -> Result<Vec<Record>, StoreError> {
///         Ok(Vec::new())
///     }
///
///     async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Load every record in stored order
    ///
    /// # Returns
    /// * `Ok(records)` - The current snapshot; empty for a freshly initialized store
    /// * `Err(StoreError::Corrupt)` - The snapshot could not be decoded, decrypted or parsed
    async fn load(&self) -> Result<Vec<Record>, StoreError>;

    /// Replace the stored snapshot with `records`
    ///
    /// A failed save leaves either the previous or the new snapshot in place,
    /// never a mixture of both.
    ///
    /// # Returns
    /// * `Ok(())` - The new snapshot is durable
    /// * `Err(StoreError::Write)` - The write failed
    async fn save(&self, records: &[Record]) -> Result<(), StoreError>;
}
