//! Configuration for the verification service

use std::time::Duration;

use rc_shared::config::verification::DEFAULT_CODE_LENGTH;
use rc_shared::AppConfig;

/// Attempts at drawing an unused identifier before provisioning gives up
pub const MAX_IDENTIFIER_DRAWS: usize = 10;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Length of generated codes
    pub code_length: usize,
    /// Bound on each record store load or save
    pub io_timeout: Duration,
    /// Bound on one notifier call
    pub notify_timeout: Duration,
    /// Identifier draws per provisioning request
    pub max_identifier_draws: usize,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            io_timeout: Duration::from_millis(5_000),
            notify_timeout: Duration::from_secs(10),
            max_identifier_draws: MAX_IDENTIFIER_DRAWS,
        }
    }
}

impl VerificationServiceConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            code_length: config.verification.code_length,
            io_timeout: config.store.io_timeout(),
            notify_timeout: config.notifier.timeout(),
            max_identifier_draws: MAX_IDENTIFIER_DRAWS,
        }
    }
}
