//! Tests for the OTP ledger, digest and sweeper


use std::sync::Arc;

use chrono::Utc;

use super::{CodeDigester, ManualClock, OtpLedger, OtpLedgerConfig};

pub(crate) const TEST_KEY: &[u8] = b"test-hmac-key-0123456789abcdef";
pub(crate) const MOBILE: &str = "9998887777";

/// Ledger on a manual clock with default policy
pub(crate) fn ledger_with_clock() -> (OtpLedger, Arc<ManualClock>) {
    ledger_with_config(OtpLedgerConfig::default())
}

pub(crate) fn ledger_with_config(config: OtpLedgerConfig) -> (OtpLedger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let digester = CodeDigester::new(TEST_KEY).unwrap();
    let ledger = OtpLedger::with_clock(config, digester, clock.clone());
    (ledger, clock)
}

/// A 4-digit code guaranteed to differ from `code`
pub(crate) fn wrong_code(code: &str) -> String {
    let value: u32 = code.parse().unwrap();
    format!("{:04}", (value + 1) % 10_000)
}
