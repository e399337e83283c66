//! Integration tests for the verify-and-rotate flow through the public API

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use rc_core::{
        BlockListRepository, MockBlockListRepository, MockRecordRepository, Notifier, OriginGuard,
        Record, RecordRepository, SnapshotCipher, VerificationService, VerificationServiceConfig,
        VerifyResult,
    };
    use rc_shared::GuardConfig;

    struct CapturingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Notifier for CapturingNotifier {
        async fn notify(&self, email: &str, code: &str) -> Result<String, String> {
            self.sent
                .lock()
                .unwrap()
                .push((email.to_string(), code.to_string()));
            Ok("captured".to_string())
        }
    }

    type DynService = VerificationService<dyn RecordRepository, dyn BlockListRepository, dyn Notifier>;

    fn build(records: Vec<Record>) -> (DynService, Arc<CapturingNotifier>) {
        let notifier = Arc::new(CapturingNotifier {
            sent: Mutex::new(Vec::new()),
        });
        let blocks: Arc<dyn BlockListRepository> = Arc::new(MockBlockListRepository::new());
        let guard = OriginGuard::new(blocks, GuardConfig::default(), Duration::from_secs(1));
        let records: Arc<dyn RecordRepository> = Arc::new(MockRecordRepository::with_records(records));
        let dyn_notifier: Arc<dyn Notifier> = notifier.clone();

        let service = VerificationService::new(
            records,
            guard,
            dyn_notifier,
            VerificationServiceConfig::default(),
        )
        .unwrap();
        (service, notifier)
    }

    #[tokio::test]
    async fn test_provision_then_rotate_through_trait_objects() {
        let (service, notifier) = build(Vec::new());

        let provisioned = service
            .provision_user("dana", "dana@example.com")
            .await
            .unwrap();
        assert!(provisioned.delivered);

        let result = service
            .verify("192.0.2.44", "dana@example.com", &provisioned.identifier, &provisioned.code)
            .await
            .unwrap();
        assert_eq!(result, VerifyResult::Success { delivered: true });

        let sent = notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, provisioned.code);
        assert_ne!(sent[1].1, provisioned.code);
    }

    #[tokio::test]
    async fn test_repeated_guessing_locks_out_origin() {
        let (service, _) = build(vec![Record::new(
            "erin",
            "erin@example.com",
            "424242",
            "Aa1!Aa1!Aa1!",
        )]);

        for guess in ["aaaaaaaaaaaa", "bbbbbbbbbbbb", "cccccccccccc"] {
            let result = service
                .verify("192.0.2.50", "erin@example.com", "424242", guess)
                .await
                .unwrap();
            assert_eq!(result, VerifyResult::Mismatch);
        }

        let result = service
            .verify("192.0.2.50", "erin@example.com", "424242", "Aa1!Aa1!Aa1!")
            .await
            .unwrap();
        assert!(matches!(result, VerifyResult::Blocked { .. }));
    }

    #[test]
    fn test_sealed_snapshot_hides_contents() {
        let cipher = SnapshotCipher::new(&[42u8; 32]);
        let records = vec![Record::new(
            "frank,\nadmin",
            "frank@example.com",
            "135790",
            "Qq(9)Qq(9)Qq",
        )];

        let blob = cipher.seal_records(&records).unwrap();

        assert!(!blob.contains("frank"));
        assert_eq!(cipher.open_records(&blob).unwrap(), records);
    }
}
