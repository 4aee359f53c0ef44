//! Authentication service module
//!
//! This module ties the OTP ledger to the rest of sign-in:
//! - Code delivery through a notification sink
//! - User creation or login refresh on successful verification
//! - Access token issuance

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
