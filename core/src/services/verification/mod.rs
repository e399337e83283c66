//! Verification module for rotating one-time codes
//!
//! This module provides the complete verify-and-rotate workflow:
//! - Constant-time matching of submitted codes against the record store
//! - Rotation of an accepted code inside the store's single-writer boundary
//! - Provisioning of new records with unique identifiers
//! - Per-origin failure tracking and blocking through the origin guard
//! - Out-of-band delivery of new codes through a `Notifier`

mod config;
mod engine;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::{VerificationServiceConfig, MAX_IDENTIFIER_DRAWS};
pub use engine::{RotationEngine, DUPLICATE_IDENTIFIER};
pub use service::VerificationService;
pub use traits::Notifier;
pub use types::{ProvisionedRecord, VerifyOutcome, VerifyResult};
