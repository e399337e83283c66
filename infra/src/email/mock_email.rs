//! Mock Email Service Implementation
//!
//! Logs messages to the console instead of sending them.

use async_trait::async_trait;
use rc_shared::validation::{is_valid_email, mask_email};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use super::email_service::EmailService;
use crate::InfrastructureError;

/// A message captured by [`MockEmailService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mock email service for development and testing
///
/// This implementation:
/// - Prints messages to the console
/// - Generates mock message IDs
/// - Keeps every sent message for inspection in tests
#[derive(Clone)]
pub struct MockEmailService {
    message_count: Arc<AtomicU64>,
    sent: Arc<Mutex<Vec<SentEmail>>>,
    simulate_failure: bool,
    console_output: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            console_output,
        }
    }

    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }

    /// Messages sent so far, oldest first
    pub fn sent_messages(&self) -> Vec<SentEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Most recent message sent to `to`
    pub fn last_message_to(&self, to: &str) -> Option<SentEmail> {
        self.sent_messages().into_iter().rev().find(|m| m.to == to)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<String, InfrastructureError> {
        if !is_valid_email(to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid recipient address: {}",
                mask_email(to)
            )));
        }

        if self.simulate_failure {
            warn!(to = %mask_email(to), "Mock email service simulating failure");
            return Err(InfrastructureError::Email("Simulated email sending failure".to_string()));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", html.trim());
            println!("{}\n", "=".repeat(60));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentEmail {
                message_id: message_id.clone(),
                to: to.to_string(),
                subject: subject.to_string(),
                html: html.to_string(),
            });
        }

        info!(
            target: "email_service",
            provider = "mock",
            to = %mask_email(to),
            message_id = %message_id,
            "Email sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
