//! Keyed digest of one-time codes
//!
//! HMAC-SHA256 over a fixed domain tag followed by each field framed as a
//! 4-byte big-endian length and its bytes.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::challenge::CodeDigest;
use crate::errors::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

/// Domain separation tag mixed into every digest
const DOMAIN_TAG: &[u8] = b"ournest.otp.v1";

/// Shortest accepted HMAC key
pub const MIN_KEY_LENGTH: usize = 16;

/// Computes code digests with a process-wide secret key
#[derive(Clone)]
pub struct CodeDigester {
    mac: HmacSha256,
}

impl CodeDigester {
    /// Builds a digester from the raw key bytes
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - key shorter than [`MIN_KEY_LENGTH`]
    pub fn new(key: &[u8]) -> DomainResult<Self> {
        if key.len() < MIN_KEY_LENGTH {
            return Err(DomainError::Validation {
                message: format!(
                    "OTP HMAC key must be at least {} bytes, got {}",
                    MIN_KEY_LENGTH,
                    key.len()
                ),
            });
        }

        let mac = HmacSha256::new_from_slice(key).map_err(|e| DomainError::Internal {
            message: format!("Failed to initialise OTP HMAC: {}", e),
        })?;

        Ok(Self { mac })
    }

    /// Digest of (subject, challenge id, code); identical inputs give identical output
    pub fn digest(&self, subject: &str, challenge_id: &str, code: &str) -> CodeDigest {
        let mut mac = self.mac.clone();
        mac.update(DOMAIN_TAG);
        for field in [subject, challenge_id, code] {
            mac.update(&(field.len() as u32).to_be_bytes());
            mac.update(field.as_bytes());
        }

        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        CodeDigest::from_bytes(out)
    }
}

impl fmt::Debug for CodeDigester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeDigester")
            .field("key", &"<redacted>")
            .finish()
    }
}
