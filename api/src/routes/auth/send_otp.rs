use actix_web::{web, HttpResponse};
use validator::Validate;

use nest_core::repositories::UserRepository;
use nest_core::services::NotificationSink;
use nest_shared::phone::mask_phone_number;

use super::AppState;
use crate::dto::auth::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/send-otp
///
/// # Request Body
///
/// ```json
/// { "mobile": "9998887777" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "request_id": "5f0c2a8e4b1d49c7a3e6f2d1b0c9a8e7",
///     "message": "Verification code has been sent to your phone.",
///     "expires_in": 300
/// }
/// ```
///
/// ## Errors
/// - 400 `INVALID_MOBILE` for a malformed number
/// - 429 `TOO_MANY_REQUESTS` when the number already has too many live codes
pub async fn send_otp<U, N>(
    state: web::Data<AppState<U, N>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    N: NotificationSink + 'static,
{
    if let Err(errors) = request.0.validate() {
        tracing::warn!(
            mobile = %mask_phone_number(&request.mobile),
            event = "send_otp_invalid_request",
            "Rejected send-otp request"
        );
        return handle_validation_errors(&errors);
    }

    match state.auth_service.send_otp(&request.mobile).await {
        Ok(issued) => HttpResponse::Created().json(SendOtpResponse::from(issued)),
        Err(error) => handle_domain_error(error),
    }
}
