//! Background sweeper for the OTP ledger
//!
//! Every ledger operation already sweeps lazily; the periodic task keeps
//! memory bounded when traffic is too low to trigger those sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainResult;

use super::ledger::OtpLedger;
use super::types::SweepResult;

/// Configuration for the OTP sweeper
#[derive(Debug, Clone)]
pub struct OtpSweeperConfig {
    /// How often to sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to run the background task at all
    pub enabled: bool,
}

impl Default for OtpSweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

impl OtpSweeperConfig {
    /// A zero interval disables the sweeper
    pub fn from_interval(interval_seconds: u64) -> Self {
        Self {
            interval_seconds,
            enabled: interval_seconds > 0,
        }
    }
}

/// Periodically sweeps an [`OtpLedger`]
pub struct OtpSweeper {
    ledger: Arc<OtpLedger>,
    config: OtpSweeperConfig,
}

impl OtpSweeper {
    pub fn new(ledger: Arc<OtpLedger>, config: OtpSweeperConfig) -> Self {
        Self { ledger, config }
    }

    /// Run a single sweep cycle
    pub fn run_once(&self) -> DomainResult<SweepResult> {
        let result = self.ledger.sweep()?;
        if result.removed > 0 {
            info!(
                removed = result.removed,
                remaining = result.remaining,
                event = "otp_sweep_completed",
                "Swept stale OTP challenges"
            );
        }
        Ok(result)
    }

    /// Start the sweeper as a background task
    ///
    /// Returns `None` when the sweeper is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.interval_seconds == 0 {
            warn!("OTP sweeper is disabled");
            return None;
        }

        let interval = Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "OTP sweeper started"
            );

            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_once() {
                    error!(error = %e, event = "otp_sweep_failed", "OTP sweep cycle failed");
                }
            }
        }))
    }
}
