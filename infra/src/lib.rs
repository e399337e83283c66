//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the RotaCode service,
//! following Clean Architecture principles. It provides concrete implementations
//! of the repository and notifier seams defined in `rc_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Storage**: the AES-GCM encrypted record file and the JSON block-list
//!   file, both replaced atomically on every write
//! - **Email**: email delivery (mock and HTTP mail API) and the adapter that
//!   turns an email transport into a code `Notifier`
//!
//! ## Features
//!
//! - `http-email`: Enable the HTTP mail API transport (default)

// Re-export core types for convenience
pub use rc_core::errors::*;

/// Storage module - encrypted record file and block-list file
pub mod storage;

/// Email module - email transports and the notifier adapter
pub mod email;

pub use email::{create_email_service, EmailNotifier, EmailService, MockEmailService};
pub use storage::{EncryptedFileRecordRepository, JsonBlockListRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}
