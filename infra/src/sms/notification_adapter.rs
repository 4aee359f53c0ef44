//! Notification sink adapter
//!
//! Bridges any infrastructure [`SmsService`] to the core
//! `NotificationSink` trait.

use async_trait::async_trait;
use nest_core::services::otp::NotificationSink;

use super::sms_service::SmsService;

/// Adapter that implements the core NotificationSink for an SMS provider
pub struct SmsNotificationSink<S: SmsService> {
    inner: S,
}

impl<S: SmsService> SmsNotificationSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SmsService> NotificationSink for SmsNotificationSink<S> {
    async fn send_code(&self, subject: &str, code: &str) -> Result<String, String> {
        self.inner
            .send_verification_code(subject, code)
            .await
            .map_err(|e| e.to_string())
    }
}
