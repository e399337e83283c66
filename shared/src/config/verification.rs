//! Code generation configuration

use super::parse_or;
use crate::errors::{ConfigError, ConfigResult};

/// Default length of a generated one-time code
pub const DEFAULT_CODE_LENGTH: usize = 12;

/// Shortest code length that still carries at least 64 bits over a
/// 72-symbol alphabet
pub const MIN_CODE_LENGTH: usize = 11;

/// Longest accepted code length
pub const MAX_CODE_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationConfig {
    /// Length of each generated code
    pub code_length: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl VerificationConfig {
    pub fn from_lookup<F>(lookup: &F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let code_length = parse_or(lookup, "CODE_LENGTH", DEFAULT_CODE_LENGTH)?;
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(ConfigError::invalid(
                "CODE_LENGTH",
                format!("must be between {} and {}", MIN_CODE_LENGTH, MAX_CODE_LENGTH),
            ));
        }
        Ok(Self { code_length })
    }
}
