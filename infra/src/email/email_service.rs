//! Email Service Interface
//!
//! Defines the trait for email transports that deliver rendered messages.

use async_trait::async_trait;

use crate::InfrastructureError;

/// Email transport trait
///
/// Implementations include:
/// - HTTP mail API (JSON POST)
/// - Mock implementation for development
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send an HTML email
    ///
    /// # Arguments
    ///
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `html` - HTML body
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier assigned to the message by the transport
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<String, InfrastructureError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is available
    async fn is_available(&self) -> bool {
        true
    }
}
