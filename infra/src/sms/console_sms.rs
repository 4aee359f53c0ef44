//! Console SMS provider
//!
//! Stands in for a real SMS gateway. Depending on its delivery mode it prints
//! the message to stdout, accepts it silently, or rejects it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use nest_shared::phone::{is_valid_mobile, mask_phone_number};
use nest_shared::Environment;

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// What the console provider does with a message for a valid number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleDelivery {
    /// Print the full message, code included, to stdout
    Print,
    /// Accept the message without writing it anywhere
    Suppress,
    /// Reject every message as a gateway outage would
    Fail,
}

impl ConsoleDelivery {
    /// Only development prints codes
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            ConsoleDelivery::Print
        } else {
            ConsoleDelivery::Suppress
        }
    }

    /// `event` field logged for a send in this mode
    pub fn event(self) -> &'static str {
        match self {
            ConsoleDelivery::Print => "sms_printed",
            ConsoleDelivery::Suppress => "sms_suppressed",
            ConsoleDelivery::Fail => "sms_failed",
        }
    }
}

/// SMS provider backed by the process console.
///
/// Clones share the delivered-message counter.
#[derive(Clone)]
pub struct ConsoleSmsService {
    delivery: ConsoleDelivery,
    delivered: Arc<AtomicU64>,
}

impl ConsoleSmsService {
    pub fn new(delivery: ConsoleDelivery) -> Self {
        Self {
            delivery,
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Messages accepted so far, printed or not
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsService for ConsoleSmsService {
    async fn send_sms(&self, mobile: &str, message: &str) -> Result<String, InfrastructureError> {
        let masked = mask_phone_number(mobile);

        if !is_valid_mobile(mobile) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid mobile number: {}",
                masked
            )));
        }

        if self.delivery == ConsoleDelivery::Fail {
            warn!(
                target: "sms_service",
                mobile = %masked,
                event = self.delivery.event(),
                "Console SMS gateway rejected the message"
            );
            return Err(InfrastructureError::Sms(
                "Console SMS gateway unavailable".to_string(),
            ));
        }

        let message_id = format!("console_{}", Uuid::new_v4());
        let sequence = self.delivered.fetch_add(1, Ordering::SeqCst) + 1;

        match self.delivery {
            ConsoleDelivery::Print => {
                println!("[SMS #{}] to {}: {}", sequence, mobile, message);
                info!(
                    target: "sms_service",
                    mobile = %masked,
                    message_id = %message_id,
                    message_length = message.len(),
                    event = self.delivery.event(),
                    "SMS printed to console"
                );
            }
            _ => info!(
                target: "sms_service",
                mobile = %masked,
                message_id = %message_id,
                event = self.delivery.event(),
                "SMS accepted; console output disabled, nothing was emitted"
            ),
        }

        Ok(message_id)
    }
}
