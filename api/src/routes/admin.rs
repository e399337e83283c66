use actix_web::{web, HttpRequest, HttpResponse};
use rc_core::errors::DomainError;
use rc_core::services::verification::DUPLICATE_IDENTIFIER;
use rc_core::{BlockListRepository, Notifier, RecordRepository};
use rc_shared::validation::mask_email;
use rc_shared::StatusResponse;
use tracing::{info, warn};
use validator::Validate;

use super::AppState;
use crate::dto::{AddUserRequest, AddUserResponse};
use crate::handlers::{handle_domain_error, messages};
use crate::middleware::{client_origin, is_authorized};

/// Handler for POST /api/admin/add-user
///
/// Provisions a record with a fresh identifier and code and emails the code.
/// When an admin token is configured the request must present it as a bearer
/// token.
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@example.com" }
/// ```
///
/// # Responses
/// - 200 `{"success": true, "message": "User added successfully", "identifier": "...", "code": "..."}`
/// - 400 `{"success": false, "message": "Username and email are required"}`
/// - 400 `{"success": false, "message": "Please try again (duplicate identifier)"}`
/// - 401 `{"success": false, "message": "Unauthorized"}`
/// - 500 `{"success": false, "message": "Server error"}`
pub async fn add_user<R, B, N>(
    req: HttpRequest,
    state: web::Data<AppState<R, B, N>>,
    request: web::Json<AddUserRequest>,
) -> HttpResponse
where
    R: RecordRepository + ?Sized + 'static,
    B: BlockListRepository + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    if !is_authorized(&req, state.admin_token.as_deref()) {
        warn!(
            origin = %client_origin(&req, state.trust_proxy_headers),
            event = "admin_unauthorized",
            "Rejected admin request without a valid token"
        );
        return HttpResponse::Unauthorized().json(StatusResponse::failure(messages::UNAUTHORIZED));
    }

    if request.validate().is_err() {
        return HttpResponse::BadRequest()
            .json(StatusResponse::failure(messages::USERNAME_AND_EMAIL_REQUIRED));
    }

    match state
        .verification_service
        .provision_user(request.username.trim(), request.email.trim())
        .await
    {
        Ok(provisioned) => {
            info!(
                identifier = %provisioned.identifier,
                email = %mask_email(&provisioned.email),
                delivered = provisioned.delivered,
                event = "admin_user_added",
                "Admin provisioned a record"
            );
            HttpResponse::Ok().json(AddUserResponse::new(provisioned.identifier, provisioned.code))
        }
        Err(error) => provision_failure(error),
    }
}

fn provision_failure(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { ref message } if message == DUPLICATE_IDENTIFIER => {
            warn!(event = "identifier_draws_exhausted", "No free identifier found for new record");
            HttpResponse::BadRequest().json(StatusResponse::failure(messages::DUPLICATE_IDENTIFIER))
        }
        other => handle_domain_error(other, messages::USERNAME_AND_EMAIL_REQUIRED),
    }
}
