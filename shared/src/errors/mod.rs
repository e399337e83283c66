//! Shared error types

use thiserror::Error;

/// Errors raised while assembling configuration from the environment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
