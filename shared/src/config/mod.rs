//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `guard` - Failure threshold and block duration for the origin guard
//! - `notifier` - Out-of-band code delivery (email transport)
//! - `server` - HTTP server configuration
//! - `store` - Record store and block-list files, encryption key, I/O bounds
//! - `verification` - Code generation parameters
//!
//! Every sub-configuration exposes `from_lookup`, which reads values through a
//! caller-supplied function. `from_env` is `from_lookup` over the process
//! environment; tests pass a map instead.

pub mod environment;
pub mod guard;
pub mod notifier;
pub mod server;
pub mod store;
pub mod verification;

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use guard::GuardConfig;
pub use notifier::{NotifierConfig, NotifierProvider};
pub use server::ServerConfig;
pub use store::StoreConfig;
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Record store and block list configuration
    pub store: StoreConfig,

    /// Origin guard configuration
    pub guard: GuardConfig,

    /// Code generation configuration
    pub verification: VerificationConfig,

    /// Notification configuration
    pub notifier: NotifierConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a key/value map
    pub fn from_map(values: &HashMap<String, String>) -> ConfigResult<Self> {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Load configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup)?;
        let config = Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            store: StoreConfig::from_lookup(&lookup)?,
            guard: GuardConfig::from_lookup(&lookup)?,
            verification: VerificationConfig::from_lookup(&lookup)?,
            notifier: NotifierConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(environment, &lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-cutting requirements that depend on the environment
    pub fn validate(&self) -> ConfigResult<()> {
        if self.environment.is_production() {
            if self.notifier.provider == NotifierProvider::Mock {
                return Err(ConfigError::invalid(
                    "NOTIFIER_PROVIDER",
                    "the mock notifier cannot be used in production",
                ));
            }
            if self.server.admin_token.is_none() {
                return Err(ConfigError::missing("ADMIN_TOKEN"));
            }
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

/// Read and parse an optional variable, falling back to `default` when unset or blank
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match non_blank(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

/// Read a variable, treating blank values as unset
pub(crate) fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
