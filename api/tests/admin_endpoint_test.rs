//! Endpoint tests for POST /api/admin/add-user

mod common;

use actix_web::{http::StatusCode, test};
use rc_api::app::create_app;
use serde_json::{json, Value};

use common::fixture;

fn add_user_request(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/admin/add-user")
        .peer_addr("192.0.2.20:40000".parse().unwrap())
        .set_json(body)
}

#[actix_web::test]
async fn test_add_user_returns_identifier_and_code() {
    let fx = fixture(Vec::new(), false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let req = add_user_request(json!({"username": "bob", "email": "bob@example.com"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "User added successfully");
    let identifier = json["identifier"].as_str().unwrap();
    let code = json["code"].as_str().unwrap();
    assert_eq!(identifier.len(), 6);
    assert!(identifier.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(code.len(), 12);

    // Stored and emailed
    let stored = fx.records.records().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].identifier, identifier);
    assert_eq!(fx.notifier.last_code_for("bob@example.com").as_deref(), Some(code));

    // The new code verifies
    let verify = test::TestRequest::post()
        .uri("/api/verify")
        .peer_addr("192.0.2.21:40000".parse().unwrap())
        .set_json(json!({"email": "bob@example.com", "identifier": identifier, "code": code}))
        .to_request();
    let json: Value = test::read_body_json(test::call_service(&app, verify).await).await;
    assert_eq!(json["message"], "Verified");
}

#[actix_web::test]
async fn test_add_user_requires_fields() {
    let fx = fixture(Vec::new(), false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    for body in [
        json!({"email": "bob@example.com"}),
        json!({"username": "bob"}),
        json!({"username": "bob", "email": "not-an-email"}),
        json!({"username": "   ", "email": "bob@example.com"}),
    ] {
        let resp = test::call_service(&app, add_user_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(
            json,
            json!({"success": false, "message": "Username and email are required"})
        );
    }
    assert!(fx.records.records().await.is_empty());
}

#[actix_web::test]
async fn test_admin_token_enforced_when_configured() {
    let fx = fixture(Vec::new(), false, Some("s3cret"));
    let app = test::init_service(create_app(fx.state.clone())).await;
    let body = json!({"username": "carol", "email": "carol@example.com"});

    let resp = test::call_service(&app, add_user_request(body.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let wrong = add_user_request(body.clone())
        .insert_header(("Authorization", "Bearer guess"))
        .to_request();
    assert_eq!(test::call_service(&app, wrong).await.status(), StatusCode::UNAUTHORIZED);
    assert!(fx.records.records().await.is_empty());

    let good = add_user_request(body)
        .insert_header(("Authorization", "Bearer s3cret"))
        .to_request();
    assert_eq!(test::call_service(&app, good).await.status(), StatusCode::OK);
    assert_eq!(fx.records.records().await.len(), 1);
}

#[actix_web::test]
async fn test_store_failure_is_server_error() {
    let fx = fixture(Vec::new(), false, None);
    fx.records.set_fail_save(true);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let req = add_user_request(json!({"username": "dave", "email": "dave@example.com"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"success": false, "message": "Server error"}));
    assert_eq!(fx.notifier.sent_count(), 0);
}
