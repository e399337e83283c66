//! Origin guard configuration

use chrono::Duration;

use super::parse_or;
use crate::errors::{ConfigError, ConfigResult};

/// Longest accepted block (ten years)
pub const MAX_BLOCK_DURATION_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Failure threshold and block length for the per-origin guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    /// Consecutive failures that trigger a block
    pub failure_threshold: u32,

    /// How long a block lasts, in seconds
    pub block_duration_seconds: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            block_duration_seconds: default_block_duration_seconds(),
        }
    }
}

impl GuardConfig {
    pub fn new(failure_threshold: u32, block_duration_seconds: u64) -> Self {
        Self {
            failure_threshold,
            block_duration_seconds,
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            failure_threshold: parse_or(lookup, "FAILURE_THRESHOLD", default_failure_threshold())?,
            block_duration_seconds: parse_or(
                lookup,
                "BLOCK_DURATION_SECONDS",
                default_block_duration_seconds(),
            )?,
        };
        if config.failure_threshold == 0 {
            return Err(ConfigError::invalid("FAILURE_THRESHOLD", "must be at least 1"));
        }
        if config.block_duration_seconds > MAX_BLOCK_DURATION_SECONDS {
            return Err(ConfigError::invalid(
                "BLOCK_DURATION_SECONDS",
                format!("must not exceed {}", MAX_BLOCK_DURATION_SECONDS),
            ));
        }
        Ok(config)
    }

    pub fn block_duration(&self) -> Duration {
        let seconds = self.block_duration_seconds.min(MAX_BLOCK_DURATION_SECONDS);
        Duration::seconds(seconds as i64)
    }
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_block_duration_seconds() -> u64 {
    24 * 60 * 60 // 24 hours
}
