//! Types for verification and provisioning results

use chrono::{DateTime, Utc};

/// Outcome of matching one submitted code against the store
#[derive(Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The code matched and has been replaced by `new_code`
    Success {
        email: String,
        username: String,
        identifier: String,
        new_code: String,
    },
    /// Unknown identifier, wrong code, or malformed input
    Mismatch,
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success { .. })
    }
}

impl std::fmt::Debug for VerifyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyOutcome::Success {
                email,
                username,
                identifier,
                ..
            } => f
                .debug_struct("Success")
                .field("email", email)
                .field("username", username)
                .field("identifier", identifier)
                .field("new_code", &"<redacted>")
                .finish(),
            VerifyOutcome::Mismatch => f.write_str("Mismatch"),
        }
    }
}

/// Result of a verification request as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    /// Code accepted and rotated; `delivered` tells whether the new code reached the notifier
    Success { delivered: bool },
    /// Code not accepted
    Mismatch,
    /// The origin is blocked until the given instant
    Blocked { until: DateTime<Utc> },
}

/// A record created through provisioning, including its first code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedRecord {
    pub username: String,
    pub email: String,
    pub identifier: String,
    pub code: String,
    /// Whether the initial code reached the notifier
    pub delivered: bool,
}
