//! Domain-specific error types and error handling.
//!
//! A mismatching code or a blocked origin is not an error: both are outcomes
//! of a verification. Everything here is either rejected input or a failure
//! of the store, the notifier or the runtime.

use thiserror::Error;

/// Failures of the record store or the block list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The persisted blob could not be decoded, decrypted or parsed
    #[error("store is corrupt: {reason}")]
    Corrupt { reason: String },

    /// Writing the store failed; nothing may be assumed about partial success
    #[error("store write failed: {message}")]
    Write { message: String },

    /// A load or save did not finish within the configured bound
    #[error("store operation timed out after {millis}ms")]
    Timeout { millis: u64 },
}

impl StoreError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Delivery failed or timed out; never undoes a committed rotation
    #[error("Notification failed: {message}")]
    Notify { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the failure is on the server side (surfaced as a generic server error)
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::Store(_) | DomainError::Notify { .. } | DomainError::Internal { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
