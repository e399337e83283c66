use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use rc_core::errors::DomainError;
use rc_shared::StatusResponse;
use tracing::{debug, error};

/// User-facing messages. None of them reveal whether an identifier exists.
pub mod messages {
    pub const VERIFIED: &str = "Verified";
    pub const UNRECOGNISED: &str = "Unrecognised";
    pub const TOO_MANY_ATTEMPTS: &str = "Too many failed attempts. Please try again later.";
    pub const FIELDS_REQUIRED: &str = "All fields are required";
    pub const USERNAME_AND_EMAIL_REQUIRED: &str = "Username and email are required";
    pub const DUPLICATE_IDENTIFIER: &str = "Please try again (duplicate identifier)";
    pub const UNAUTHORIZED: &str = "Unauthorized";
    pub const INVALID_BODY: &str = "Invalid request body";
    pub const SERVER_ERROR: &str = "Server error";
}

/// Map a domain error to a `{success, message}` response
///
/// `validation_message` is the endpoint's wording for a 400. Server-side
/// failures are logged here and answered with a generic 500.
pub fn handle_domain_error(error: DomainError, validation_message: &str) -> HttpResponse {
    match error {
        DomainError::Validation { message } => {
            debug!(reason = %message, "Request rejected by validation");
            HttpResponse::BadRequest().json(StatusResponse::failure(validation_message))
        }
        other => {
            error!(error = %other, event = "request_failed", "Request failed on the server side");
            HttpResponse::InternalServerError().json(StatusResponse::failure(messages::SERVER_ERROR))
        }
    }
}

/// Answer unparsable JSON bodies with the standard envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected malformed JSON body");
    let response = HttpResponse::BadRequest().json(StatusResponse::failure(messages::INVALID_BODY));
    actix_web::error::InternalError::from_response(err, response).into()
}
