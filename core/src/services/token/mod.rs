//! Token service module for JWT management
//!
//! This module handles HS256 access token issuance and verification after a
//! successful OTP sign-in.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
