//! Bearer token check for the admin endpoints

use actix_web::{http::header, HttpRequest};
use constant_time_eq::constant_time_eq;

/// Whether `req` may use the admin endpoints
///
/// With no configured token every request is allowed; otherwise the request
/// must carry `Authorization: Bearer <token>`.
pub fn is_authorized(req: &HttpRequest, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| constant_time_eq(token.trim().as_bytes(), expected.as_bytes()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_open_when_no_token_configured() {
        let req = TestRequest::default().to_http_request();
        assert!(is_authorized(&req, None));
    }

    #[test]
    fn test_bearer_token_required() {
        let missing = TestRequest::default().to_http_request();
        assert!(!is_authorized(&missing, Some("s3cret")));

        let wrong = TestRequest::default()
            .insert_header(("Authorization", "Bearer nope"))
            .to_http_request();
        assert!(!is_authorized(&wrong, Some("s3cret")));

        let basic = TestRequest::default()
            .insert_header(("Authorization", "Basic s3cret"))
            .to_http_request();
        assert!(!is_authorized(&basic, Some("s3cret")));

        let good = TestRequest::default()
            .insert_header(("Authorization", "Bearer s3cret"))
            .to_http_request();
        assert!(is_authorized(&good, Some("s3cret")));
    }
}
