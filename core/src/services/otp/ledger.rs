//! In-process ledger of outstanding OTP challenges

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use nest_shared::phone::mask_phone_number;

use crate::domain::entities::challenge::{Challenge, ChallengeState};
use crate::errors::{DomainError, DomainResult, OtpError};

use super::clock::{Clock, SystemClock};
use super::code::{generate_challenge_id, generate_code};
use super::config::OtpLedgerConfig;
use super::digest::CodeDigester;
use super::types::{IssuedCode, SweepResult, VerifiedChallenge};

type ChallengeMap = HashMap<String, Challenge>;

/// Ephemeral store of issued challenges keyed by challenge id.
///
/// One mutex guards the whole map. Every operation sweeps lapsed records
/// first, then works on the map under the same lock; nothing inside the
/// lock performs I/O.
pub struct OtpLedger {
    config: OtpLedgerConfig,
    digester: CodeDigester,
    clock: Arc<dyn Clock>,
    records: Mutex<ChallengeMap>,
}

impl OtpLedger {
    /// Create a ledger reading the wall clock
    pub fn new(config: OtpLedgerConfig, digester: CodeDigester) -> Self {
        Self::with_clock(config, digester, Arc::new(SystemClock))
    }

    /// Create a ledger with an explicit time source
    pub fn with_clock(config: OtpLedgerConfig, digester: CodeDigester, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            digester,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &OtpLedgerConfig {
        &self.config
    }

    /// Issue a new challenge for `subject`
    ///
    /// The subject must already be format-validated by the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - Challenge id and plaintext code for delivery
    /// * `Err(DomainError::Otp(TooManyRequests))` - Pending ceiling reached for this subject
    /// * `Err(DomainError::Internal)` - Ledger lock poisoned
    pub fn issue(&self, subject: &str) -> DomainResult<IssuedCode> {
        let now = self.clock.now();

        let outcome = {
            let mut records = self.lock()?;
            let removed = Self::sweep_locked(&mut records, now, self.config.retention);
            if removed > 0 {
                tracing::debug!(removed = removed, event = "otp_swept", "Dropped stale OTP challenges");
            }
            self.issue_locked(&mut records, subject, now)
        };

        match &outcome {
            Ok(issued) => tracing::info!(
                mobile = %mask_phone_number(subject),
                challenge_id = %issued.challenge_id,
                expires_at = %issued.expires_at,
                event = "otp_issued",
                "Issued OTP challenge"
            ),
            Err(OtpError::TooManyRequests {
                limit,
                retry_after_seconds,
            }) => tracing::warn!(
                mobile = %mask_phone_number(subject),
                limit = *limit,
                retry_after_seconds = *retry_after_seconds,
                event = "otp_rate_limited",
                "Pending OTP ceiling reached"
            ),
            Err(_) => {}
        }

        outcome.map_err(DomainError::from)
    }

    /// Verify `candidate_code` against the challenge `challenge_id`
    ///
    /// Checks run in a fixed order: lookup, consumed, subject, expiry,
    /// attempt ceiling, then the constant-time digest comparison. Only the
    /// last step counts as an attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedChallenge)` - Code accepted; the challenge is now consumed
    /// * `Err(DomainError::Otp(_))` - One of the protocol rejections
    /// * `Err(DomainError::Internal)` - Ledger lock poisoned
    pub fn verify(
        &self,
        challenge_id: &str,
        subject: &str,
        candidate_code: &str,
    ) -> DomainResult<VerifiedChallenge> {
        let now = self.clock.now();

        let outcome = {
            let mut records = self.lock()?;
            Self::sweep_locked(&mut records, now, self.config.retention);
            match records.get_mut(challenge_id) {
                Some(record) => self.check_and_consume(record, subject, candidate_code, now),
                None => Err(OtpError::ChallengeNotFound),
            }
        };

        match &outcome {
            Ok(verified) => tracing::info!(
                mobile = %mask_phone_number(subject),
                challenge_id = %verified.challenge_id,
                attempts = verified.attempts,
                event = "otp_verified_success",
                "OTP challenge verified"
            ),
            Err(error) => tracing::warn!(
                mobile = %mask_phone_number(subject),
                challenge_id = challenge_id,
                error_code = error.error_code(),
                event = "otp_verification_failed",
                "OTP verification rejected"
            ),
        }

        outcome.map_err(DomainError::from)
    }

    /// Drop records past their retention window and expire lapsed ones
    pub fn sweep(&self) -> DomainResult<SweepResult> {
        let now = self.clock.now();
        let mut records = self.lock()?;
        let removed = Self::sweep_locked(&mut records, now, self.config.retention);
        Ok(SweepResult {
            removed,
            remaining: records.len(),
        })
    }

    /// Number of records currently held, in any state
    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Live pending challenges for `subject`
    pub fn pending_for(&self, subject: &str) -> DomainResult<usize> {
        let now = self.clock.now();
        let records = self.lock()?;
        Ok(records
            .values()
            .filter(|c| c.subject == subject && c.is_live_pending(now))
            .count())
    }

    /// Snapshot of a single record
    pub fn inspect(&self, challenge_id: &str) -> DomainResult<Option<Challenge>> {
        Ok(self.lock()?.get(challenge_id).cloned())
    }

    fn issue_locked(
        &self,
        records: &mut ChallengeMap,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedCode, OtpError> {
        let outstanding: Vec<&Challenge> = records
            .values()
            .filter(|c| c.subject == subject && c.is_live_pending(now))
            .collect();

        if outstanding.len() >= self.config.max_pending_per_subject {
            let retry_after_seconds = outstanding
                .iter()
                .map(|c| c.seconds_until_expiry(now))
                .min()
                .unwrap_or_else(|| self.config.ttl.num_seconds().max(1));
            return Err(OtpError::TooManyRequests {
                limit: self.config.max_pending_per_subject,
                retry_after_seconds,
            });
        }

        let mut challenge_id = generate_challenge_id();
        while records.contains_key(challenge_id.as_str()) {
            challenge_id = generate_challenge_id();
        }

        let code = generate_code();
        let code_digest = self
            .digester
            .digest(subject, challenge_id.as_str(), code.as_str());
        let challenge = Challenge::new(
            challenge_id.clone(),
            subject.to_string(),
            code_digest,
            now,
            self.config.ttl,
        );
        let expires_at = challenge.expires_at;
        records.insert(challenge_id.as_str().to_string(), challenge);

        Ok(IssuedCode {
            challenge_id,
            code,
            created_at: now,
            expires_at,
        })
    }

    fn check_and_consume(
        &self,
        record: &mut Challenge,
        subject: &str,
        candidate_code: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedChallenge, OtpError> {
        if record.state == ChallengeState::Verified {
            return Err(OtpError::AlreadyConsumed);
        }
        if record.subject != subject {
            return Err(OtpError::SubjectMismatch);
        }
        if record.state == ChallengeState::Expired || record.is_lapsed(now) {
            record.mark_expired();
            return Err(OtpError::Expired);
        }
        if record.attempt_count >= self.config.max_attempts {
            return Err(OtpError::AttemptsExceeded);
        }

        record.record_attempt();

        let candidate = self
            .digester
            .digest(subject, record.id.as_str(), candidate_code);
        if !record.code_digest.matches(&candidate) {
            return Err(OtpError::IncorrectCode {
                remaining_attempts: record.remaining_attempts(self.config.max_attempts),
            });
        }

        record.mark_verified(now);
        Ok(VerifiedChallenge {
            challenge_id: record.id.clone(),
            subject: record.subject.clone(),
            attempts: record.attempt_count,
            verified_at: now,
        })
    }

    /// Removes records past `expires_at + retention`, then marks lapsed
    /// pending ones as expired. Returns the number removed.
    fn sweep_locked(records: &mut ChallengeMap, now: DateTime<Utc>, retention: Duration) -> usize {
        let before = records.len();
        records.retain(|_, c| !c.is_disposable(now, retention));
        for challenge in records.values_mut() {
            if challenge.state == ChallengeState::Pending && challenge.is_lapsed(now) {
                challenge.mark_expired();
            }
        }
        before - records.len()
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, ChallengeMap>> {
        self.records.lock().map_err(|_| {
            tracing::error!(event = "otp_ledger_poisoned", "OTP ledger lock poisoned");
            DomainError::Internal {
                message: "OTP ledger lock poisoned".to_string(),
            }
        })
    }
}

impl std::fmt::Debug for OtpLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpLedger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
