//! Shared utilities and common types for the RotaCode server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Configuration error types
//! - Response envelopes returned by the HTTP layer
//! - Input validation helpers (identifier, email, field checks)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, GuardConfig, LoggingConfig, NotifierConfig, NotifierProvider,
    ServerConfig, StoreConfig, VerificationConfig,
};
pub use errors::{ConfigError, ConfigResult};
pub use types::{HealthResponse, StatusResponse};
pub use utils::validation;
