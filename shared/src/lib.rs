//! Shared utilities and common types for the OurNest server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structure and error codes
//! - Utility functions (mobile number and OTP format checks)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, JwtConfig, LogFormat, LoggingConfig, OtpConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::{phone, validation};
