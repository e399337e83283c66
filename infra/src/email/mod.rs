//! Email Module
//!
//! Email transports used to deliver rotated codes, and the adapter exposing
//! them to the verification service as a `Notifier`.
//!
//! ## Features
//!
//! - **Email Service Trait**: Common interface for all transports
//! - **Mock Implementation**: Console output for development
//! - **HTTP Mail API**: JSON POST with retry and backoff
//! - **Security**: Recipient masking in logs

use rc_shared::{NotifierConfig, NotifierProvider};

pub mod email_service;
pub mod mock_email;
pub mod notifier_adapter;

#[cfg(feature = "http-email")]
pub mod http_email;

pub use email_service::EmailService;
pub use mock_email::{MockEmailService, SentEmail};
pub use notifier_adapter::{render_code_email, EmailNotifier, CODE_EMAIL_SUBJECT};

#[cfg(feature = "http-email")]
pub use http_email::{HttpEmailConfig, HttpEmailService};

#[cfg(test)]
mod tests;

/// Create an email service based on configuration
///
/// Falls back to the mock transport when the configured provider cannot be
/// initialized.
pub fn create_email_service(config: &NotifierConfig) -> Box<dyn EmailService> {
    match config.provider {
        NotifierProvider::Mock => Box::new(MockEmailService::new()),
        #[cfg(feature = "http-email")]
        NotifierProvider::Http => {
            match HttpEmailConfig::from_notifier_config(config).and_then(HttpEmailService::new) {
                Ok(service) => Box::new(service),
                Err(e) => {
                    tracing::error!("Failed to initialize HTTP email service: {}", e);
                    tracing::warn!("Falling back to mock email service");
                    Box::new(MockEmailService::new())
                }
            }
        }
        #[cfg(not(feature = "http-email"))]
        NotifierProvider::Http => {
            tracing::warn!("HTTP email provider requires the http-email feature, using mock implementation");
            Box::new(MockEmailService::new())
        }
    }
}
