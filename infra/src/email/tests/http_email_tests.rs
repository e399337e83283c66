//! Send-path tests for the HTTP mail API service against a local mock server

use std::net::TcpListener;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::email::{EmailService, HttpEmailConfig, HttpEmailService};
use crate::InfrastructureError;

const TO: &str = "alice@example.com";
const SUBJECT: &str = "Your New Verification Code";
const HTML: &str = "<p>code</p>";

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn service_for(server: &MockServer) -> HttpEmailService {
    HttpEmailService::new(HttpEmailConfig {
        api_url: format!("{}/send", server.uri()),
        api_key: Some("key_123".to_string()),
        from_address: "codes@example.com".to_string(),
        max_retries: 3,
        retry_delay_ms: 10,
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_send_posts_message_once_and_returns_api_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .and(header("Authorization", "Bearer key_123"))
        .and(body_json(json!({
            "from": "codes@example.com",
            "to": TO,
            "subject": SUBJECT,
            "html": HTML
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_123" })))
        .expect(1)
        .mount(&server)
        .await;

    let message_id = service_for(&server).send_email(TO, SUBJECT, HTML).await.unwrap();
    assert_eq!(message_id, "msg_123");
}

#[tokio::test]
async fn test_send_without_response_body_generates_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let message_id = service_for(&server).send_email(TO, SUBJECT, HTML).await.unwrap();
    assert!(message_id.starts_with("http_"));
}

#[tokio::test]
async fn test_server_errors_are_retried_up_to_limit() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = service_for(&server).send_email(TO, SUBJECT, HTML).await.unwrap_err();
    match err {
        InfrastructureError::Email(msg) => assert!(msg.contains("after 3 attempts")),
        other => panic!("Expected Email error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_after_retry" })))
        .expect(1)
        .mount(&server)
        .await;

    let message_id = service_for(&server).send_email(TO, SUBJECT, HTML).await.unwrap();
    assert_eq!(message_id, "msg_after_retry");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad sender"))
        .expect(1)
        .mount(&server)
        .await;

    let err = service_for(&server).send_email(TO, SUBJECT, HTML).await.unwrap_err();
    match err {
        InfrastructureError::Email(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("bad sender"));
        }
        other => panic!("Expected Email error, got {:?}", other),
    }
}
