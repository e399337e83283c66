//! Record store and block list configuration

use std::path::PathBuf;
use std::time::Duration;

use super::{non_blank, parse_or};
use crate::errors::{ConfigError, ConfigResult};

/// Size of the AES-256 key protecting the record snapshot
pub const STORE_KEY_LENGTH: usize = 32;

/// Files backing the service plus the key material for the record snapshot
#[derive(Clone)]
pub struct StoreConfig {
    /// Encrypted record snapshot
    pub records_path: PathBuf,

    /// JSON block list (origin -> ISO-8601 expiry)
    pub block_list_path: PathBuf,

    /// AES-256-GCM key
    pub encryption_key: [u8; STORE_KEY_LENGTH],

    /// Upper bound for a single load or save, in milliseconds
    pub io_timeout_ms: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("records_path", &self.records_path)
            .field("block_list_path", &self.block_list_path)
            .field("encryption_key", &"<redacted>")
            .field("io_timeout_ms", &self.io_timeout_ms)
            .finish()
    }
}

impl StoreConfig {
    /// Create a configuration with default paths and timeout
    pub fn new(encryption_key: [u8; STORE_KEY_LENGTH]) -> Self {
        Self {
            records_path: PathBuf::from("users.enc"),
            block_list_path: PathBuf::from("blocked_ips.json"),
            encryption_key,
            io_timeout_ms: default_io_timeout_ms(),
        }
    }

    /// Place both files inside `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.records_path = dir.join("users.enc");
        self.block_list_path = dir.join("blocked_ips.json");
        self
    }

    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_key = non_blank(lookup, "STORE_ENCRYPTION_KEY")
            .ok_or_else(|| ConfigError::missing("STORE_ENCRYPTION_KEY"))?;
        let encryption_key = parse_key(&raw_key)?;

        let mut config = Self::new(encryption_key);
        if let Some(path) = non_blank(lookup, "RECORDS_FILE") {
            config.records_path = PathBuf::from(path);
        }
        if let Some(path) = non_blank(lookup, "BLOCKED_ORIGINS_FILE") {
            config.block_list_path = PathBuf::from(path);
        }
        config.io_timeout_ms = parse_or(lookup, "STORE_IO_TIMEOUT_MS", default_io_timeout_ms())?;
        if config.io_timeout_ms == 0 {
            return Err(ConfigError::invalid("STORE_IO_TIMEOUT_MS", "must be greater than zero"));
        }
        Ok(config)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Decode a 64-character hex key
pub fn parse_key(raw: &str) -> ConfigResult<[u8; STORE_KEY_LENGTH]> {
    let bytes = hex::decode(raw)
        .map_err(|e| ConfigError::invalid("STORE_ENCRYPTION_KEY", e.to_string()))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        ConfigError::invalid(
            "STORE_ENCRYPTION_KEY",
            format!("expected {} bytes, got {}", STORE_KEY_LENGTH, bytes.len()),
        )
    })
}

fn default_io_timeout_ms() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn test_parse_key() {
        let key = parse_key(KEY_HEX).unwrap();
        assert_eq!(key[0], 0);
        assert_eq!(key[31], 0x1f);
    }

    #[test]
    fn test_parse_key_rejects_wrong_length_and_garbage() {
        assert!(parse_key("0011").is_err());
        assert!(parse_key(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let lookup = |key: &str| match key {
            "STORE_ENCRYPTION_KEY" => Some(KEY_HEX.to_string()),
            "RECORDS_FILE" => Some("/var/lib/rotacode/records.enc".to_string()),
            "STORE_IO_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        };
        let config = StoreConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.records_path, PathBuf::from("/var/lib/rotacode/records.enc"));
        assert_eq!(config.block_list_path, PathBuf::from("blocked_ips.json"));
        assert_eq!(config.io_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let lookup = |key: &str| match key {
            "STORE_ENCRYPTION_KEY" => Some(KEY_HEX.to_string()),
            "STORE_IO_TIMEOUT_MS" => Some("0".to_string()),
            _ => None,
        };
        assert!(StoreConfig::from_lookup(&lookup).is_err());
    }

    #[test]
    fn test_key_never_printed() {
        let config = StoreConfig::new([7u8; STORE_KEY_LENGTH]);
        assert!(format!("{:?}", config).contains("<redacted>"));
    }
}
