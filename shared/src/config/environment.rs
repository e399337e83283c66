//! Environment configuration module

use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::errors::{ConfigError, ConfigResult};

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Get environment from the `ENVIRONMENT` (or `ENV`, `RUST_ENV`) variable
    ///
    /// Unset means development; an unrecognised value is an error rather than
    /// a silent fallback.
    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = non_blank(lookup, "ENVIRONMENT")
            .or_else(|| non_blank(lookup, "ENV"))
            .or_else(|| non_blank(lookup, "RUST_ENV"));
        match raw {
            Some(value) => value
                .parse()
                .map_err(|e: String| ConfigError::invalid("ENVIRONMENT", e)),
            None => Ok(Environment::Development),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` directive); `RUST_LOG` still takes precedence at startup
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
            },
            Environment::Production => Self {
                level: String::from("info"),
                format: LogFormat::Json,
            },
        }
    }

    /// Environment defaults, overridden by `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_lookup<F>(env: Environment, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::for_environment(env);
        if let Some(level) = non_blank(lookup, "LOG_LEVEL") {
            config.level = level;
        }
        match non_blank(lookup, "LOG_FORMAT").as_deref() {
            Some("json") => config.format = LogFormat::Json,
            Some("pretty") => config.format = LogFormat::Pretty,
            Some("compact") => config.format = LogFormat::Compact,
            _ => {}
        }
        config
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}
