//! Mock implementations for testing the verification service

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::services::verification::traits::Notifier;

/// Records every delivered `(email, code)` pair
pub struct MockNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub should_fail: bool,
    pub delay: Option<Duration>,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            should_fail,
            delay: None,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(false)
        }
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, email: &str, code: &str) -> Result<String, String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err("mock notifier failure".to_string());
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((email.to_string(), code.to_string()));
        Ok(format!("mock-msg-{}", sent.len()))
    }
}
