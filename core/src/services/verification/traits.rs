//! Out-of-band delivery of codes

use async_trait::async_trait;

/// Delivers a freshly issued code to the owner of a record
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `code` to `email`, returning the transport's message id
    async fn notify(&self, email: &str, code: &str) -> Result<String, String>;
}
