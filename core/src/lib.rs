//! # OurNest Core
//!
//! Core business logic and domain layer for the OurNest backend.
//! This crate contains the OTP challenge ledger, domain entities, business
//! services, repository interfaces and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AccessToken, AuthResponse, Claims, IssuedChallenge, User};
pub use errors::{AuthError, DomainError, DomainResult, OtpError, TokenError};
pub use repositories::{UserLogin, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, CodeDigester, NotificationSink, OtpLedger, OtpLedgerConfig,
    OtpSweeper, OtpSweeperConfig, TokenService, TokenServiceConfig,
};
