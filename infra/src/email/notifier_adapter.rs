//! Email Notifier Adapter
//!
//! Implements the core [`Notifier`] trait on top of any [`EmailService`], so
//! the verification service can deliver rotated codes by email.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rc_core::services::verification::Notifier;
use std::sync::Arc;

use super::email_service::EmailService;

/// Subject line of every code delivery
pub const CODE_EMAIL_SUBJECT: &str = "Your New Verification Code";

/// Adapter that renders the code email and sends it through an email transport
pub struct EmailNotifier<E: EmailService + ?Sized> {
    inner: Arc<E>,
}

impl<E: EmailService + ?Sized> EmailNotifier<E> {
    pub fn new(inner: Arc<E>) -> Self {
        Self { inner }
    }

    pub fn transport(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: EmailService + ?Sized> Notifier for EmailNotifier<E> {
    async fn notify(&self, email: &str, code: &str) -> Result<String, String> {
        let html = render_code_email(email, code, &Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        self.inner
            .send_email(email, CODE_EMAIL_SUBJECT, &html)
            .await
            .map_err(|e| e.to_string())
    }
}

/// HTML body announcing a freshly issued code
pub fn render_code_email(email: &str, code: &str, generated_at: &str) -> String {
    format!(
        "<h2>New Verification Code</h2>\n\
         <p>Your account was just verified.</p>\n\
         <p>Your new verification code is: <strong>{}</strong></p>\n\
         <p>Generated at: {}</p>\n\
         <p>This verification was requested from: {}</p>\n",
        escape_html(code),
        escape_html(generated_at),
        escape_html(email),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
