//! In-memory implementation of RecordRepository for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::entities::Record;
use crate::errors::StoreError;

use super::trait_::RecordRepository;

/// Mock record repository with failure injection and call counters
pub struct MockRecordRepository {
    records: RwLock<Vec<Record>>,
    load_count: AtomicUsize,
    save_count: AtomicUsize,
    fail_load: AtomicBool,
    fail_save: AtomicBool,
    save_delay_ms: AtomicU64,
}

impl MockRecordRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a mock repository holding `records`
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            load_count: AtomicUsize::new(0),
            save_count: AtomicUsize::new(0),
            fail_load: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            save_delay_ms: AtomicU64::new(0),
        }
    }

    /// Current stored snapshot
    pub async fn records(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    /// Number of successful and failed `load` calls so far
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Number of completed `save` calls that changed the snapshot
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Make every `load` report a corrupt store
    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    /// Make every `save` report a write failure
    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::SeqCst);
    }

    /// Delay each `save` before it takes effect
    pub fn set_save_delay(&self, delay: Duration) {
        self.save_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for MockRecordRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn load(&self) -> Result<Vec<Record>, StoreError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(StoreError::corrupt("mock load failure"));
        }
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let delay = self.save_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(StoreError::write("mock save failure"));
        }

        let mut stored = self.records.write().await;
        *stored = records.to_vec();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
