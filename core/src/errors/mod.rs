//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, OtpError, TokenError};

use nest_shared::error_codes;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Stable code for API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::NotFound { .. } => error_codes::NOT_FOUND,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Otp(e) => e.error_code(),
            DomainError::Auth(e) => e.error_code(),
            DomainError::Token(e) => e.error_code(),
        }
    }

    /// Whether the error is an infrastructure fault rather than a business outcome
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::Internal { .. } | DomainError::Token(TokenError::TokenGenerationFailed)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
