use actix_web::{web, HttpResponse};
use validator::Validate;

use nest_core::repositories::UserRepository;
use nest_core::services::NotificationSink;

use super::AppState;
use crate::dto::auth::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_errors};

/// Handler for POST /api/v1/auth/verify-otp
///
/// # Request Body
///
/// ```json
/// {
///     "request_id": "5f0c2a8e4b1d49c7a3e6f2d1b0c9a8e7",
///     "mobile": "9998887777",
///     "otp": "0427"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP verified successfully.",
///     "access_token": "eyJ...",
///     "token_type": "bearer",
///     "expires_in": 3600,
///     "user": { "id": "...", "mobile": "9998887777", "is_new_user": true }
/// }
/// ```
///
/// ## Errors
/// 400 with `CHALLENGE_NOT_FOUND`, `SUBJECT_MISMATCH`, `OTP_EXPIRED`,
/// `OTP_ALREADY_USED`, `ATTEMPTS_EXCEEDED` or `INCORRECT_CODE`;
/// 403 `USER_INACTIVE` for a deactivated account.
pub async fn verify_otp<U, N>(
    state: web::Data<AppState<U, N>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    N: NotificationSink + 'static,
{
    if let Err(errors) = request.0.validate() {
        tracing::warn!(event = "verify_otp_invalid_request", "Rejected verify-otp request");
        return handle_validation_errors(&errors);
    }

    let VerifyOtpRequest {
        request_id,
        mobile,
        otp,
    } = request.into_inner();

    match state
        .auth_service
        .verify_otp(&request_id, &mobile, &otp)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(VerifyOtpResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
