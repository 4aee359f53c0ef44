//! Types for OTP ledger results

use chrono::{DateTime, Utc};

use crate::domain::entities::challenge::{ChallengeId, OneTimeCode};

/// Result of issuing a challenge
///
/// Carries the plaintext code so the caller can hand it to the
/// notification sink; the ledger itself keeps only the digest.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Identifier the client will present on verification
    pub challenge_id: ChallengeId,
    /// Plaintext one-time code
    pub code: OneTimeCode,
    /// Issue instant
    pub created_at: DateTime<Utc>,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}

impl IssuedCode {
    /// Whole seconds between issue and expiry
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - self.created_at).num_seconds()
    }
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedChallenge {
    /// Consumed challenge
    pub challenge_id: ChallengeId,
    /// Mobile number the challenge was bound to
    pub subject: String,
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// Verification instant
    pub verified_at: DateTime<Utc>,
}

/// Outcome of a sweep pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Records dropped after their retention window
    pub removed: usize,
    /// Records left in the ledger
    pub remaining: usize,
}
