//! Record ledger: the single-writer boundary around the record store.
//!
//! Every read-modify-write cycle on the store (code rotation, provisioning)
//! runs inside [`RecordLedger::transact`], which holds one store-wide async
//! mutex from the load until the save has settled. Plain reads go straight to
//! the repository: saves replace the snapshot atomically, so a reader always
//! sees a complete snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::domain::entities::Record;
use crate::errors::{DomainError, DomainResult, StoreError};
use crate::repositories::RecordRepository;

/// Result of a transaction body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// The records were modified and must be persisted before `T` is returned
    Commit(T),
    /// Nothing changed; no write happens
    Unchanged(T),
}

pub struct RecordLedger<R: RecordRepository + ?Sized> {
    repository: Arc<R>,
    write_lock: Arc<Mutex<()>>,
    io_timeout: Duration,
}

impl<R: RecordRepository + ?Sized + 'static> RecordLedger<R> {
    /// Create a ledger over `repository`, bounding each load and save by `io_timeout`
    pub fn new(repository: Arc<R>, io_timeout: Duration) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
            io_timeout,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Load the current snapshot without taking the write lock
    pub async fn read(&self) -> Result<Vec<Record>, StoreError> {
        self.load_bounded().await
    }

    /// Run `body` against the current records under the store-wide lock.
    ///
    /// The records are saved only when `body` returns [`Mutation::Commit`].
    /// If `body` fails, nothing is written and its error is returned.
    ///
    /// Loads are bounded by the I/O timeout. A started save is never
    /// abandoned: an overrun is logged and the save's own result is returned.
    /// The save runs on its own task and holds the lock until it settles, even
    /// if the caller is dropped.
    pub async fn transact<T, F>(&self, body: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Vec<Record>) -> DomainResult<Mutation<T>>,
    {
        let guard = self.write_lock.clone().lock_owned().await;

        let mut records = self.load_bounded().await?;
        let value = match body(&mut records)? {
            Mutation::Unchanged(value) => return Ok(value),
            Mutation::Commit(value) => value,
        };

        let repository = Arc::clone(&self.repository);
        let mut write = tokio::spawn(async move {
            let result = repository.save(&records).await;
            drop(guard);
            result
        });

        let joined = match timeout(self.io_timeout, &mut write).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(
                    event = "store_save_overrun",
                    timeout_ms = self.io_timeout.as_millis() as u64,
                    "Record save exceeded the I/O bound; waiting for it to settle"
                );
                write.await
            }
        };

        match joined {
            Ok(result) => result?,
            Err(join_error) => {
                return Err(DomainError::Internal {
                    message: format!("record save task failed: {}", join_error),
                })
            }
        }

        Ok(value)
    }

    async fn load_bounded(&self) -> Result<Vec<Record>, StoreError> {
        match timeout(self.io_timeout, self.repository.load()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    event = "store_load_timeout",
                    timeout_ms = self.io_timeout.as_millis() as u64,
                    "Record load exceeded the I/O bound"
                );
                Err(self.timeout_error())
            }
        }
    }

    fn timeout_error(&self) -> StoreError {
        StoreError::Timeout {
            millis: self.io_timeout.as_millis() as u64,
        }
    }
}
