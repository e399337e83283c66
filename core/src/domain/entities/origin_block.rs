//! Origin block entries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mapping from origin key to block expiry, as persisted in the block list file
pub type BlockList = HashMap<String, DateTime<Utc>>;

/// A temporary block on a request origin (client network address)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginBlock {
    /// Origin key, usually the client IP address
    pub origin: String,

    /// Instant at which the block stops applying
    pub blocked_until: DateTime<Utc>,
}

impl OriginBlock {
    pub fn new(origin: impl Into<String>, blocked_until: DateTime<Utc>) -> Self {
        Self {
            origin: origin.into(),
            blocked_until,
        }
    }

    /// A block applies while `now < blocked_until`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.blocked_until
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Whole seconds until the block expires (zero once expired)
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> i64 {
        (self.blocked_until - now).num_seconds().max(0)
    }
}
