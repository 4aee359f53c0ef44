//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the OurNest backend.
//! It provides concrete implementations for the traits defined in
//! `nest_core`:
//!
//! - **SMS**: console SMS provider and the adapter exposing any provider as a
//!   core `NotificationSink`
//! - **Repositories**: in-memory user repository standing in for the
//!   relational store

/// SMS service module - code delivery providers
pub mod sms;

/// Repository implementations
pub mod repositories;

pub use repositories::InMemoryUserRepository;
pub use sms::{ConsoleDelivery, ConsoleSmsService, SmsNotificationSink, SmsService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
