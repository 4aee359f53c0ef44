//! One-time password issuance and verification
//!
//! This module provides the challenge/response workflow behind mobile sign-in:
//! - CSPRNG code and challenge id generation
//! - HMAC-SHA256 code digests (plaintext codes are never stored)
//! - An in-process ledger with expiry, attempt ceiling and per-number rate limit
//! - A background sweeper for stale records

mod clock;
mod code;
mod config;
mod digest;
mod ledger;
mod sweeper;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{generate_challenge_id, generate_code};
pub use config::OtpLedgerConfig;
pub use digest::{CodeDigester, MIN_KEY_LENGTH};
pub use ledger::OtpLedger;
pub use sweeper::{OtpSweeper, OtpSweeperConfig};
pub use traits::NotificationSink;
pub use types::{IssuedCode, SweepResult, VerifiedChallenge};
