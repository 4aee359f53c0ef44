//! Trait for delivering one-time codes

use async_trait::async_trait;

/// Outbound channel for one-time codes (SMS gateway, console, ...)
///
/// Delivery is best-effort: failures are logged by the caller and never
/// fail issuance.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `code` to `subject`, returning a provider message id
    async fn send_code(&self, subject: &str, code: &str) -> Result<String, String>;
}
