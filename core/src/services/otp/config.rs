//! Configuration for the OTP ledger

use chrono::Duration;
use nest_shared::config::auth::{MAX_RETENTION_MINUTES, MAX_TTL_MINUTES};
use nest_shared::OtpConfig;

use crate::domain::entities::challenge::{DEFAULT_TTL_MINUTES, MAX_ATTEMPTS, MAX_PENDING_PER_SUBJECT};

/// Configuration for the OTP ledger
#[derive(Debug, Clone)]
pub struct OtpLedgerConfig {
    /// Lifetime of an issued challenge
    pub ttl: Duration,
    /// Verification attempts allowed per challenge
    pub max_attempts: u32,
    /// Live pending challenges allowed per mobile number
    pub max_pending_per_subject: usize,
    /// How long lapsed or consumed records are kept before removal
    pub retention: Duration,
}

impl Default for OtpLedgerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            max_attempts: MAX_ATTEMPTS,
            max_pending_per_subject: MAX_PENDING_PER_SUBJECT,
            retention: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }
}

/// Windows are clamped to the bounds `OtpConfig::validate` enforces, so an
/// unvalidated config still yields representable durations.
impl From<&OtpConfig> for OtpLedgerConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ttl: Duration::minutes(config.ttl_minutes.clamp(1, MAX_TTL_MINUTES)),
            max_attempts: config.max_attempts,
            max_pending_per_subject: config.max_pending_per_subject,
            retention: Duration::minutes(
                config
                    .effective_retention_minutes()
                    .min(MAX_RETENTION_MINUTES),
            ),
        }
    }
}
