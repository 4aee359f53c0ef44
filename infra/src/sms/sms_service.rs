//! SMS Service Interface
//!
//! Defines the trait for SMS providers that deliver one-time codes.

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS service trait for sending text messages
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message to a mobile number
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Unique identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, mobile: &str, message: &str) -> Result<String, InfrastructureError>;

    /// Send a one-time login code using the standard message format
    async fn send_verification_code(
        &self,
        mobile: &str,
        code: &str,
    ) -> Result<String, InfrastructureError> {
        self.send_sms(mobile, &format_otp_message(code)).await
    }
}

/// Standard login code message
pub fn format_otp_message(code: &str) -> String {
    format!(
        "Your OurNest login code is {}. Do not share this code with anyone.",
        code
    )
}
