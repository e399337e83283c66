//! Origin guard states

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-origin position in the failure-tracking state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    /// No recent failures
    Clear,
    /// `failures` consecutive failures, still below the threshold
    Warned { failures: u32 },
    /// Every attempt is refused until `until`
    Blocked { until: DateTime<Utc> },
}

impl GuardState {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GuardState::Blocked { .. })
    }

    pub fn blocked_until(&self) -> Option<DateTime<Utc>> {
        match self {
            GuardState::Blocked { until } => Some(*until),
            _ => None,
        }
    }
}
