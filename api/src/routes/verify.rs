use actix_web::{web, HttpRequest, HttpResponse};
use rc_core::{BlockListRepository, Notifier, RecordRepository, VerifyResult};
use rc_shared::StatusResponse;

use super::AppState;
use crate::dto::VerifyRequest;
use crate::handlers::{handle_domain_error, messages};
use crate::middleware::client_origin;

/// Handler for POST /api/verify
///
/// Checks an identifier/code pair and, on a match, rotates the code and emails
/// the new one to the record's owner.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "identifier": "123456",
///     "code": "X1aB#cD$eF%g"
/// }
/// ```
///
/// # Responses
/// - 200 `{"success": true, "message": "Verified"}`
/// - 200 `{"success": false, "message": "Unrecognised"}`
/// - 400 `{"success": false, "message": "All fields are required"}`: email missing
/// - 403 `{"success": false, "message": "Too many failed attempts. Please try again later."}`
/// - 500 `{"success": false, "message": "Server error"}`
pub async fn verify<R, B, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, B, N>>,
    request: web::Json<VerifyRequest>,
) -> HttpResponse
where
    R: RecordRepository + ?Sized + 'static,
    B: BlockListRepository + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    let origin = client_origin(&req, state.trust_proxy_headers);

    let result = state
        .verification_service
        .verify(&origin, &request.email, &request.identifier, &request.code)
        .await;

    match result {
        Ok(VerifyResult::Success { .. }) => HttpResponse::Ok().json(StatusResponse::ok(messages::VERIFIED)),
        Ok(VerifyResult::Mismatch) => HttpResponse::Ok().json(StatusResponse::failure(messages::UNRECOGNISED)),
        Ok(VerifyResult::Blocked { .. }) => {
            HttpResponse::Forbidden().json(StatusResponse::failure(messages::TOO_MANY_ATTEMPTS))
        }
        Err(error) => handle_domain_error(error, messages::FIELDS_REQUIRED),
    }
}
