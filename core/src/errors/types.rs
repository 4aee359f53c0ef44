//! Domain-specific error types for OTP sign-in and token handling
//!
//! Each variant maps to a stable error code (see [`nest_shared::error_codes`])
//! so clients can decide between "resend" and "re-enter code" flows.

use nest_shared::error_codes;
use thiserror::Error;

/// Business outcomes of the OTP challenge/response protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Too many pending codes for this number (limit {limit}); retry in {retry_after_seconds} seconds")]
    TooManyRequests { limit: usize, retry_after_seconds: i64 },

    #[error("Challenge not found")]
    ChallengeNotFound,

    #[error("Mobile number does not match the challenge")]
    SubjectMismatch,

    #[error("One-time code expired")]
    Expired,

    #[error("One-time code already used")]
    AlreadyConsumed,

    #[error("Maximum verification attempts exceeded")]
    AttemptsExceeded,

    #[error("Incorrect one-time code ({remaining_attempts} attempt(s) remaining)")]
    IncorrectCode { remaining_attempts: u32 },
}

impl OtpError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::TooManyRequests { .. } => error_codes::TOO_MANY_REQUESTS,
            OtpError::ChallengeNotFound => error_codes::CHALLENGE_NOT_FOUND,
            OtpError::SubjectMismatch => error_codes::SUBJECT_MISMATCH,
            OtpError::Expired => error_codes::OTP_EXPIRED,
            OtpError::AlreadyConsumed => error_codes::OTP_ALREADY_USED,
            OtpError::AttemptsExceeded => error_codes::ATTEMPTS_EXCEEDED,
            OtpError::IncorrectCode { .. } => error_codes::INCORRECT_CODE,
        }
    }

    /// Message suitable for showing to the person signing in
    pub fn user_message(&self) -> String {
        match self {
            OtpError::TooManyRequests { .. } => {
                "You have reached the max OTP requests. Try after some time.".to_string()
            }
            OtpError::ChallengeNotFound | OtpError::SubjectMismatch => {
                "Invalid request or mobile number.".to_string()
            }
            OtpError::Expired => "OTP expired. Tap Resend to get a new code.".to_string(),
            OtpError::AlreadyConsumed => "This code was already used.".to_string(),
            OtpError::AttemptsExceeded => {
                "Maximum attempts exceeded. Request a new code.".to_string()
            }
            OtpError::IncorrectCode { remaining_attempts } => format!(
                "Wrong code, please try again. {} attempt(s) remaining.",
                remaining_attempts
            ),
        }
    }
}

/// Authentication errors raised around the OTP protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid mobile number format: {mobile}")]
    InvalidSubjectFormat { mobile: String },

    #[error("User account is inactive")]
    UserInactive,
}

impl AuthError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidSubjectFormat { .. } => error_codes::INVALID_MOBILE,
            AuthError::UserInactive => error_codes::USER_INACTIVE,
        }
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidToken => error_codes::TOKEN_INVALID,
            TokenError::TokenGenerationFailed => error_codes::INTERNAL_ERROR,
        }
    }
}
