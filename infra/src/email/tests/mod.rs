//! Unit tests for email module

#[cfg(feature = "http-email")]
pub mod http_email_tests;
