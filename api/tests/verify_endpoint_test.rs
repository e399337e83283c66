//! Endpoint tests for POST /api/verify

mod common;

use actix_web::{http::StatusCode, test};
use rc_api::app::create_app;
use serde_json::{json, Value};

use common::{alice, fixture, ALICE_CODE};

const PEER: &str = "192.0.2.10:50000";

fn verify_request(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/verify")
        .peer_addr(PEER.parse().unwrap())
        .set_json(body)
}

#[actix_web::test]
async fn test_correct_code_verifies_and_rotates() {
    let fx = fixture(vec![alice()], false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let body = json!({"email": "alice@example.com", "identifier": "123456", "code": ALICE_CODE});
    let resp = test::call_service(&app, verify_request(body.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"success": true, "message": "Verified"}));

    // The emailed code is the one now stored
    let new_code = fx.notifier.last_code_for("alice@example.com").unwrap();
    assert_ne!(new_code, ALICE_CODE);
    assert_eq!(fx.records.records().await[0].code, new_code);

    // Replaying the old code fails
    let resp = test::call_service(&app, verify_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"success": false, "message": "Unrecognised"}));
}

#[actix_web::test]
async fn test_missing_email_is_bad_request_and_not_counted() {
    let fx = fixture(vec![alice()], false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    for body in [
        json!({"identifier": "123456", "code": ALICE_CODE}),
        json!({"email": "   ", "identifier": "123456", "code": ALICE_CODE}),
        json!({"email": "", "identifier": "123456", "code": "wrong"}),
        json!({}),
    ] {
        let resp = test::call_service(&app, verify_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json, json!({"success": false, "message": "All fields are required"}));
    }

    // Four rejected requests did not block the origin
    let body = json!({"email": "alice@example.com", "identifier": "123456", "code": ALICE_CODE});
    let resp = test::call_service(&app, verify_request(body).to_request()).await;
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], true);
}

#[actix_web::test]
async fn test_fourth_attempt_after_three_failures_is_forbidden() {
    let fx = fixture(vec![alice()], false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    for code in ["wrong-1", "wrong-2", "wrong-3"] {
        let body = json!({"email": "alice@example.com", "identifier": "123456", "code": code});
        let resp = test::call_service(&app, verify_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "Unrecognised");
    }

    // Even the right code is refused now
    let body = json!({"email": "alice@example.com", "identifier": "123456", "code": ALICE_CODE});
    let resp = test::call_service(&app, verify_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(
        json,
        json!({"success": false, "message": "Too many failed attempts. Please try again later."})
    );
    assert_eq!(fx.notifier.sent_count(), 0);
}

#[actix_web::test]
async fn test_malformed_identifier_counts_as_mismatch() {
    let fx = fixture(vec![alice()], false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let body = json!({"email": "alice@example.com", "identifier": "12a456", "code": ALICE_CODE});
    let resp = test::call_service(&app, verify_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "Unrecognised");
    assert_eq!(fx.records.load_count(), 0);
}

#[actix_web::test]
async fn test_proxy_origins_are_tracked_separately_when_trusted() {
    let fx = fixture(vec![alice()], true, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    for _ in 0..3 {
        let body = json!({"email": "alice@example.com", "identifier": "123456", "code": "wrong"});
        let req = verify_request(body)
            .insert_header(("X-Forwarded-For", "203.0.113.1"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let body = json!({"email": "alice@example.com", "identifier": "123456", "code": ALICE_CODE});
    let blocked = verify_request(body.clone())
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    assert_eq!(test::call_service(&app, blocked).await.status(), StatusCode::FORBIDDEN);

    let other = verify_request(body)
        .insert_header(("X-Forwarded-For", "203.0.113.2"))
        .to_request();
    let resp = test::call_service(&app, other).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "Verified");
}

#[actix_web::test]
async fn test_store_failure_is_server_error() {
    let fx = fixture(vec![alice()], false, None);
    fx.records.set_fail_load(true);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let body = json!({"email": "alice@example.com", "identifier": "123456", "code": ALICE_CODE});
    let resp = test::call_service(&app, verify_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"success": false, "message": "Server error"}));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let fx = fixture(vec![alice()], false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/verify")
        .peer_addr(PEER.parse().unwrap())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], false);
}

#[actix_web::test]
async fn test_health_and_fallback_routes() {
    let fx = fixture(Vec::new(), false, None);
    let app = test::init_service(create_app(fx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["status"], "healthy");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
