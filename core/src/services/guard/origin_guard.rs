//! Failure tracking and temporary blocking of request origins
//!
//! Consecutive failed verifications are counted per origin in memory. When the
//! count reaches the configured threshold the origin is blocked for the
//! configured duration, the counter is dropped, and the block list is written
//! to the repository before the failure is reported back. Blocks expire
//! lazily: the first check after expiry clears the entry in memory, and the
//! file is pruned on the next escalation write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use rc_shared::GuardConfig;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::domain::entities::{BlockList, OriginBlock};
use crate::errors::StoreError;
use crate::repositories::BlockListRepository;

use super::state::GuardState;

#[derive(Default)]
struct GuardTables {
    failures: HashMap<String, u32>,
    blocks: BlockList,
}

/// Exclusive right to act for one origin
///
/// Held from the block check until the attempt's outcome is recorded, so two
/// concurrent attempts from the same origin are evaluated one after the other.
pub struct OriginPermit {
    origin: String,
    _guard: OwnedMutexGuard<()>,
}

impl OriginPermit {
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

pub struct OriginGuard<B: BlockListRepository + ?Sized> {
    repository: Arc<B>,
    config: GuardConfig,
    io_timeout: Duration,
    tables: Mutex<GuardTables>,
    permits: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<B: BlockListRepository + ?Sized> OriginGuard<B> {
    /// Create a guard with no known blocks
    pub fn new(repository: Arc<B>, config: GuardConfig, io_timeout: Duration) -> Self {
        Self::with_blocks(repository, config, io_timeout, BlockList::new())
    }

    /// Create a guard seeded from the persisted block list, dropping entries
    /// that have already expired
    pub async fn load(
        repository: Arc<B>,
        config: GuardConfig,
        io_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut blocks = match timeout(io_timeout, repository.load()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(StoreError::Timeout {
                    millis: io_timeout.as_millis() as u64,
                })
            }
        };

        let now = Utc::now();
        blocks.retain(|_, until| now < *until);
        info!(
            event = "block_list_loaded",
            active_blocks = blocks.len(),
            "Loaded persisted origin blocks"
        );

        Ok(Self::with_blocks(repository, config, io_timeout, blocks))
    }

    fn with_blocks(
        repository: Arc<B>,
        config: GuardConfig,
        io_timeout: Duration,
        blocks: BlockList,
    ) -> Self {
        Self {
            repository,
            config,
            io_timeout,
            tables: Mutex::new(GuardTables {
                failures: HashMap::new(),
                blocks,
            }),
            permits: StdMutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Wait for the exclusive permit of `origin`
    pub async fn acquire(&self, origin: &str) -> OriginPermit {
        let slot = {
            let mut permits = self
                .permits
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // Idle origins hold the only reference to their slot.
            permits.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(
                permits
                    .entry(origin.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        OriginPermit {
            origin: origin.to_string(),
            _guard: slot.lock_owned().await,
        }
    }

    /// Current state of `origin`, clearing its block if it has expired
    pub async fn check(&self, origin: &str) -> GuardState {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;

        if let Some(until) = tables.blocks.get(origin).copied() {
            if now < until {
                return GuardState::Blocked { until };
            }
            tables.blocks.remove(origin);
            info!(
                origin = origin,
                event = "origin_block_expired",
                "Origin block expired"
            );
        }

        Self::counted_state(&tables, origin)
    }

    /// Current state of `origin` without side effects
    pub async fn state(&self, origin: &str) -> GuardState {
        let now = Utc::now();
        let tables = self.tables.lock().await;

        match tables.blocks.get(origin) {
            Some(until) if now < *until => GuardState::Blocked { until: *until },
            _ => Self::counted_state(&tables, origin),
        }
    }

    /// Count one failed attempt, escalating to a block at the threshold
    pub async fn record_failure(&self, origin: &str) -> GuardState {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;

        if let Some(until) = tables.blocks.get(origin).copied() {
            if now < until {
                return GuardState::Blocked { until };
            }
            tables.blocks.remove(origin);
        }

        let failures = {
            let count = tables.failures.entry(origin.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if failures < self.config.failure_threshold {
            warn!(
                origin = origin,
                failures = failures,
                threshold = self.config.failure_threshold,
                event = "verification_failure_counted",
                "Failed verification attempt recorded"
            );
            return GuardState::Warned { failures };
        }

        let until = now + self.config.block_duration();
        tables.failures.remove(origin);
        tables.blocks.insert(origin.to_string(), until);
        tables.blocks.retain(|_, blocked_until| now < *blocked_until);

        warn!(
            origin = origin,
            failures = failures,
            blocked_until = %until,
            event = "origin_blocked",
            "Origin blocked after repeated failed verifications"
        );

        if let Err(e) = self.persist(&tables.blocks).await {
            error!(
                origin = origin,
                error = %e,
                event = "block_list_save_failed",
                "Failed to persist block list; block applies in memory only"
            );
        }

        GuardState::Blocked { until }
    }

    /// Reset the failure counter after a successful verification
    pub async fn record_success(&self, origin: &str) {
        let mut tables = self.tables.lock().await;
        if tables.failures.remove(origin).is_some() {
            info!(
                origin = origin,
                event = "verification_failures_reset",
                "Failure counter cleared after successful verification"
            );
        }
    }

    /// Active blocks, for diagnostics
    pub async fn active_blocks(&self) -> Vec<OriginBlock> {
        let now = Utc::now();
        let tables = self.tables.lock().await;
        tables
            .blocks
            .iter()
            .map(|(origin, until)| OriginBlock::new(origin.clone(), *until))
            .filter(|block| block.is_active_at(now))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn tracked_permits(&self) -> usize {
        self.permits
            .lock()
            .map(|permits| permits.len())
            .unwrap_or_default()
    }

    fn counted_state(tables: &GuardTables, origin: &str) -> GuardState {
        match tables.failures.get(origin) {
            Some(&failures) if failures > 0 => GuardState::Warned { failures },
            _ => GuardState::Clear,
        }
    }

    async fn persist(&self, blocks: &BlockList) -> Result<(), StoreError> {
        match timeout(self.io_timeout, self.repository.save(blocks)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                millis: self.io_timeout.as_millis() as u64,
            }),
        }
    }
}
