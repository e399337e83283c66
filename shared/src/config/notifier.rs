//! Notification (email delivery) configuration

use std::time::Duration;

use super::{non_blank, parse_or};
use crate::errors::{ConfigError, ConfigResult};

/// Email transport selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierProvider {
    /// Log messages instead of sending them
    Mock,
    /// JSON POST to an HTTP mail API
    Http,
}

impl std::str::FromStr for NotifierProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(NotifierProvider::Mock),
            "http" => Ok(NotifierProvider::Http),
            other => Err(format!("unknown notifier provider: {}", other)),
        }
    }
}

/// Email delivery configuration
#[derive(Clone)]
pub struct NotifierConfig {
    /// Transport to use
    pub provider: NotifierProvider,

    /// Mail API endpoint (http provider)
    pub api_url: Option<String>,

    /// Mail API bearer key (http provider)
    pub api_key: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Upper bound for a single delivery attempt, in seconds
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            provider: NotifierProvider::Mock,
            api_url: None,
            api_key: None,
            from_address: String::from("no-reply@localhost"),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("from_address", &self.from_address)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl NotifierConfig {
    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            provider: parse_or(lookup, "NOTIFIER_PROVIDER", defaults.provider)?,
            api_url: non_blank(lookup, "EMAIL_API_URL"),
            api_key: non_blank(lookup, "EMAIL_API_KEY"),
            from_address: non_blank(lookup, "EMAIL_FROM").unwrap_or(defaults.from_address),
            timeout_seconds: parse_or(lookup, "NOTIFY_TIMEOUT_SECONDS", defaults.timeout_seconds)?,
        };

        if config.provider == NotifierProvider::Http {
            let url = config
                .api_url
                .as_deref()
                .ok_or_else(|| ConfigError::missing("EMAIL_API_URL"))?;
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::invalid("EMAIL_API_URL", "must be an http(s) URL"));
            }
        }
        if config.timeout_seconds == 0 {
            return Err(ConfigError::invalid("NOTIFY_TIMEOUT_SECONDS", "must be greater than zero"));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    10
}
