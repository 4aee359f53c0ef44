use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use validator::ValidationErrors;

use nest_core::errors::{AuthError, DomainError, OtpError, TokenError};
use nest_shared::{error_codes, ErrorResponse};

const INVALID_MOBILE_MESSAGE: &str = "Please enter a valid 10-digit Indian mobile number.";

/// Extension trait for turning an error body into a response
pub trait ErrorResponseExt {
    fn to_response(self, status: StatusCode) -> HttpResponse;
}

impl ErrorResponseExt for ErrorResponse {
    fn to_response(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

/// HTTP status for a domain error
///
/// Rate limiting is 429; every other OTP outcome is a plain 400.
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Otp(OtpError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Otp(_) => StatusCode::BAD_REQUEST,
        DomainError::Auth(AuthError::InvalidSubjectFormat { .. }) => StatusCode::BAD_REQUEST,
        DomainError::Auth(AuthError::UserInactive) => StatusCode::FORBIDDEN,
        DomainError::Token(TokenError::TokenExpired | TokenError::InvalidToken) => {
            StatusCode::UNAUTHORIZED
        }
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);

    if error.is_internal() {
        tracing::error!(error = %error, event = "request_failed", "Internal error while handling request");
        return ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            .to_response(status);
    }

    tracing::info!(
        error_code = error.error_code(),
        status = status.as_u16(),
        event = "request_rejected",
        "{}",
        error
    );

    match error {
        DomainError::Otp(otp_error) => {
            let body = ErrorResponse::new(otp_error.error_code(), otp_error.user_message());
            match otp_error {
                OtpError::TooManyRequests {
                    limit,
                    retry_after_seconds,
                } => HttpResponse::build(status)
                    .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
                    .json(
                        body.add_detail("limit", limit)
                            .add_detail("retry_after_seconds", retry_after_seconds),
                    ),
                OtpError::IncorrectCode { remaining_attempts } => body
                    .add_detail("remaining_attempts", remaining_attempts)
                    .to_response(status),
                _ => body.to_response(status),
            }
        }
        DomainError::Auth(AuthError::InvalidSubjectFormat { .. }) => {
            ErrorResponse::new(error_codes::INVALID_MOBILE, INVALID_MOBILE_MESSAGE)
                .to_response(status)
        }
        DomainError::Auth(AuthError::UserInactive) => ErrorResponse::new(
            error_codes::USER_INACTIVE,
            "This account has been deactivated.",
        )
        .to_response(status),
        DomainError::Token(token_error) => {
            ErrorResponse::new(token_error.error_code(), token_error.to_string())
                .to_response(status)
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message).to_response(status)
        }
        DomainError::NotFound { resource } => {
            ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource))
                .to_response(status)
        }
        DomainError::Internal { .. } => {
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
                .to_response(status)
        }
    }
}

/// Convert request validation failures into a 400 response
///
/// A bad mobile number gets its own code so clients can highlight the field.
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let field_errors = errors.field_errors();

    let (code, message) = if let Some(mobile_errors) = field_errors.get("mobile") {
        (error_codes::INVALID_MOBILE, first_message(mobile_errors))
    } else {
        let message = field_errors
            .values()
            .next()
            .map(|errors| first_message(errors))
            .unwrap_or_else(|| "Invalid request data.".to_string());
        (error_codes::VALIDATION_ERROR, message)
    };

    let mut fields: Vec<String> = field_errors.keys().map(|field| field.to_string()).collect();
    fields.sort_unstable();

    ErrorResponse::new(code, message)
        .add_detail("fields", fields)
        .to_response(StatusCode::BAD_REQUEST)
}

fn first_message(errors: &[validator::ValidationError]) -> String {
    errors
        .first()
        .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid value.".to_string())
}

/// Response for request bodies that fail to deserialize
pub fn malformed_body_response(detail: &str) -> HttpResponse {
    tracing::debug!(detail = detail, event = "malformed_body", "Rejected malformed request body");
    ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request body.")
        .to_response(StatusCode::BAD_REQUEST)
}
