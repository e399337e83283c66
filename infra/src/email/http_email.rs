//! HTTP Mail API Email Service
//!
//! Delivers messages by POSTing JSON to a transactional mail API:
//!
//! ```text
//! POST {api_url}
//! Authorization: Bearer {api_key}
//! {"from": "...", "to": "...", "subject": "...", "html": "..."}
//! ```
//!
//! Any 2xx response counts as accepted. If the body carries an `id` field it is
//! used as the message id.

use async_trait::async_trait;
use rc_shared::validation::mask_email;
use rc_shared::NotifierConfig;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::email_service::EmailService;
use crate::InfrastructureError;

/// HTTP mail API configuration
#[derive(Clone)]
pub struct HttpEmailConfig {
    /// Endpoint receiving the JSON message
    pub api_url: String,
    /// Bearer token, if the API needs one
    pub api_key: Option<String>,
    /// Sender address
    pub from_address: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for a single request in seconds
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for HttpEmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("from_address", &self.from_address)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl HttpEmailConfig {
    /// Build from the notifier configuration
    pub fn from_notifier_config(config: &NotifierConfig) -> Result<Self, InfrastructureError> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| InfrastructureError::Config("EMAIL_API_URL not set".to_string()))?;

        Ok(Self {
            api_url,
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: config.timeout_seconds,
        })
    }
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Email service backed by an HTTP mail API
pub struct HttpEmailService {
    client: Client,
    config: HttpEmailConfig,
}

impl HttpEmailService {
    pub fn new(config: HttpEmailConfig) -> Result<Self, InfrastructureError> {
        if config.max_retries == 0 {
            return Err(InfrastructureError::Config("max_retries must be at least 1".to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            api_url = %config.api_url,
            from = %mask_email(&config.from_address),
            "HTTP email service initialized"
        );

        Ok(Self { client, config })
    }

    async fn post_once(&self, message: &OutboundEmail<'_>) -> Result<String, SendError> {
        let mut request = self.client.post(&self.config.api_url).json(message);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(SendError::Transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status(status, body));
        }

        // The body is optional; a missing or non-JSON body still means accepted
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(body["id"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("http_{}", Uuid::new_v4())))
    }

    /// Send with retry logic
    async fn send_with_retry(&self, message: &OutboundEmail<'_>) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;
            debug!(
                "Sending email attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_email(message.to)
            );

            match self.post_once(message).await {
                Ok(message_id) => {
                    info!(
                        to = %mask_email(message.to),
                        message_id = %message_id,
                        "Email sent successfully"
                    );
                    return Ok(message_id);
                }
                Err(e) => {
                    error!(
                        "Failed to send email (attempt {}/{}): {}",
                        attempts, self.config.max_retries, e
                    );

                    if !e.is_retryable() {
                        return Err(e.into());
                    }
                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Email(format!(
                            "Failed to send email after {} attempts: {}",
                            attempts, e
                        )));
                    }

                    warn!("Retrying email delivery after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<String, InfrastructureError> {
        let message = OutboundEmail {
            from: &self.config.from_address,
            to,
            subject,
            html,
        };
        self.send_with_retry(&message).await
    }

    fn provider_name(&self) -> &str {
        "HTTP"
    }
}

#[derive(Debug)]
enum SendError {
    Transport(reqwest::Error),
    Status(StatusCode, String),
}

impl SendError {
    /// Rate limiting, server errors and connection problems are retried
    fn is_retryable(&self) -> bool {
        match self {
            SendError::Transport(e) => !e.is_builder(),
            SendError::Status(status, _) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
        }
    }
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Transport(e) => write!(f, "{}", e),
            SendError::Status(status, body) if body.is_empty() => write!(f, "{}", status),
            SendError::Status(status, body) => write!(f, "{}, {}", status, body),
        }
    }
}

impl From<SendError> for InfrastructureError {
    fn from(e: SendError) -> Self {
        match e {
            SendError::Transport(e) => InfrastructureError::Http(e),
            SendError::Status(..) => InfrastructureError::Email(format!("Mail API rejected message: {}", e)),
        }
    }
}
