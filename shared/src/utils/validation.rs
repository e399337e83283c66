//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Length of a record identifier
pub const IDENTIFIER_LENGTH: usize = 6;

/// Upper bound for free-text fields (username, email)
pub const MAX_FIELD_LENGTH: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Check if a string is not empty
pub fn not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Check if a string length is within bounds (in characters)
pub fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Check that an identifier is exactly six ASCII digits
///
/// Byte length is checked first so multi-byte digits never pass.
pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier.len() == IDENTIFIER_LENGTH && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Check if an email address is valid (basic structural check)
pub fn is_valid_email(email: &str) -> bool {
    length_between(email, 3, MAX_FIELD_LENGTH) && EMAIL_PATTERN.is_match(email)
}

/// Mask an email address for logging, keeping the first character and the domain
///
/// `alice@example.com` becomes `a****@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}****@{}", first, domain)
        }
        None => "****".to_string(),
    }
}
