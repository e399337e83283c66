//! Shared fixtures for the endpoint tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;
use rc_api::routes::AppState;
use rc_core::{
    MockBlockListRepository, MockRecordRepository, Notifier, OriginGuard, Record,
    VerificationService, VerificationServiceConfig,
};
use rc_shared::GuardConfig;

pub const ALICE_CODE: &str = "X1aB#cD$eF%g";

pub fn alice() -> Record {
    Record::new("alice", "alice@example.com", "123456", ALICE_CODE)
}

/// Notifier that records every delivery
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
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
impl Notifier for CapturingNotifier {
    async fn notify(&self, email: &str, code: &str) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(format!("captured_{}", self.sent_count()))
    }
}

pub type TestState = AppState<MockRecordRepository, MockBlockListRepository, CapturingNotifier>;

pub struct Fixture {
    pub state: web::Data<TestState>,
    pub records: Arc<MockRecordRepository>,
    pub notifier: Arc<CapturingNotifier>,
}

pub fn fixture(records: Vec<Record>, trust_proxy_headers: bool, admin_token: Option<&str>) -> Fixture {
    let records = Arc::new(MockRecordRepository::with_records(records));
    let notifier = Arc::new(CapturingNotifier::default());
    let guard = OriginGuard::new(
        Arc::new(MockBlockListRepository::new()),
        GuardConfig::default(),
        Duration::from_secs(1),
    );

    let service = VerificationService::new(
        records.clone(),
        guard,
        notifier.clone(),
        VerificationServiceConfig::default(),
    )
    .unwrap();

    let state = web::Data::new(AppState {
        verification_service: Arc::new(service),
        trust_proxy_headers,
        admin_token: admin_token.map(str::to_string),
    });

    Fixture {
        state,
        records,
        notifier,
    }
}
