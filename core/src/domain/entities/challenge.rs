//! OTP challenge entity held by the in-process ledger.
//!
//! A challenge binds a claimed mobile number to a keyed digest of a short
//! one-time code. The plaintext code is never part of the record.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

/// Number of random bytes behind a challenge identifier
pub const CHALLENGE_ID_BYTES: usize = 16;

/// Number of decimal digits in a one-time code
pub const CODE_LENGTH: usize = 4;

/// Default lifetime of a challenge (5 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Default verification attempt ceiling per challenge
pub const MAX_ATTEMPTS: u32 = 5;

/// Default number of live pending challenges allowed per mobile number
pub const MAX_PENDING_PER_SUBJECT: usize = 3;

/// Opaque, unguessable challenge identifier (lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(String);

impl ChallengeId {
    /// Wraps an already generated identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeState {
    /// Issued and awaiting the correct code
    Pending,
    /// Consumed by a successful verification
    Verified,
    /// Lapsed before being consumed
    Expired,
}

impl ChallengeState {
    /// `Verified` and `Expired` never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChallengeState::Pending)
    }
}

/// Plaintext one-time code.
///
/// Travels once from issuance to the notification sink. `Debug` is redacted
/// so the value cannot leak through structured logging.
#[derive(Clone, PartialEq, Eq)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OneTimeCode(****)")
    }
}

/// 32-byte HMAC-SHA256 digest of (subject, challenge id, code)
#[derive(Clone, PartialEq, Eq)]
pub struct CodeDigest([u8; 32]);

impl CodeDigest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Constant-time comparison against another digest
    pub fn matches(&self, other: &CodeDigest) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CodeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CodeDigest(<redacted>)")
    }
}

/// One issued OTP challenge
#[derive(Debug, Clone)]
pub struct Challenge {
    /// Lookup key
    pub id: ChallengeId,

    /// Mobile number the challenge is bound to
    pub subject: String,

    /// Keyed digest of the one-time code
    pub code_digest: CodeDigest,

    /// Timestamp when the challenge was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Attempts that reached digest comparison
    pub attempt_count: u32,

    /// Current lifecycle state
    pub state: ChallengeState,

    /// Timestamp of the successful verification, if any
    pub verified_at: Option<DateTime<Utc>>,
}

impl Challenge {
    /// Creates a pending challenge expiring `ttl` after `created_at`.
    ///
    /// An expiry past the representable range saturates at the latest instant.
    pub fn new(
        id: ChallengeId,
        subject: String,
        code_digest: CodeDigest,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            subject,
            code_digest,
            created_at,
            expires_at: created_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            attempt_count: 0,
            state: ChallengeState::Pending,
            verified_at: None,
        }
    }

    /// Whether `now` is past the expiry instant
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Pending and not yet lapsed; the only records counted for rate limiting
    pub fn is_live_pending(&self, now: DateTime<Utc>) -> bool {
        self.state == ChallengeState::Pending && !self.is_lapsed(now)
    }

    /// Whether the record has outlived the retention window and may be dropped.
    /// A window reaching past the representable range never elapses.
    pub fn is_disposable(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        self.expires_at
            .checked_add_signed(retention)
            .map_or(false, |limit| now > limit)
    }

    /// Whole seconds until expiry, never less than one
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.expires_at - now;
        let seconds = remaining.num_seconds();
        let rounded_up = if remaining > Duration::seconds(seconds) {
            seconds + 1
        } else {
            seconds
        };
        rounded_up.max(1)
    }

    /// Attempts left before the ceiling trips
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempt_count)
    }

    pub fn record_attempt(&mut self) {
        self.attempt_count = self.attempt_count.saturating_add(1);
    }

    /// Pending → Expired; terminal states are left untouched
    pub fn mark_expired(&mut self) {
        if !self.state.is_terminal() {
            self.state = ChallengeState::Expired;
        }
    }

    /// Pending → Verified. Returns `false` if the record was not pending.
    pub fn mark_verified(&mut self, at: DateTime<Utc>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = ChallengeState::Verified;
        self.verified_at = Some(at);
        true
    }
}
