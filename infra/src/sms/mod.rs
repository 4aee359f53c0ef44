//! SMS Service Module
//!
//! SMS providers for delivering one-time login codes, plus the adapter that
//! exposes a provider to the core sign-in flow.
//!
//! Mobile numbers are always masked in logs.

pub mod console_sms;
pub mod notification_adapter;
pub mod sms_service;

pub use console_sms::{ConsoleDelivery, ConsoleSmsService};
pub use notification_adapter::SmsNotificationSink;
pub use sms_service::{format_otp_message, SmsService};
