//! Verification record entity.

use serde::{Deserialize, Serialize};

pub use rc_shared::validation::IDENTIFIER_LENGTH;

/// A registered user together with their current one-time code
///
/// `identifier` is the stable public lookup key (six ASCII digits, unique
/// across the store). `code` is the secret that is valid for exactly one
/// successful verification.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Display name supplied at provisioning time
    pub username: String,

    /// Delivery address for rotated codes (not a lookup key)
    pub email: String,

    /// Stable six-digit identifier
    pub identifier: String,

    /// Current one-time code
    pub code: String,
}

impl Record {
    /// Creates a new record
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        identifier: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            identifier: identifier.into(),
            code: code.into(),
        }
    }

    /// Returns a copy of this record carrying `code` instead of the current one
    pub fn with_code(&self, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..self.clone()
        }
    }
}

// The code is a live credential; keep it out of logs.
impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("identifier", &self.identifier)
            .field("code", &"<redacted>")
            .finish()
    }
}
