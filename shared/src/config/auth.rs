//! Authentication configuration: JWT issuance and OTP challenge policy

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Minimum accepted length (in bytes) for signing and digest secrets
pub const MIN_SECRET_LENGTH: usize = 16;

/// Upper bound for the challenge lifetime (one day)
pub const MAX_TTL_MINUTES: i64 = 24 * 60;

/// Upper bound for how long settled challenges are retained (one day)
pub const MAX_RETENTION_MINUTES: i64 = 24 * 60;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens. Required outside development.
    #[serde(default)]
    pub secret: Option<String>,

    /// Access token expiry time in minutes
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// JWT audience claim
    #[serde(default = "default_audience")]
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            access_token_expiry_minutes: default_access_token_expiry_minutes(),
            issuer: default_issuer(),
            audience: default_audience(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Access token expiry in seconds, as reported to clients
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Resolve the signing secret for the given environment.
    ///
    /// Returns `Ok(None)` when no secret is configured in development; the
    /// caller is then expected to generate an ephemeral one.
    pub fn secret_for(&self, environment: Environment) -> Result<Option<&str>, String> {
        resolve_secret("JWT secret", self.secret.as_deref(), environment)
    }
}

/// OTP challenge policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a challenge stays answerable after issuance
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Verification attempts allowed per challenge
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Non-expired pending challenges allowed per mobile number
    #[serde(default = "default_max_pending_per_subject")]
    pub max_pending_per_subject: usize,

    /// Minutes an expired or consumed challenge is kept before a sweep drops it.
    /// Defaults to the TTL when unset.
    #[serde(default)]
    pub retention_minutes: Option<i64>,

    /// Background sweep period in seconds (0 disables the sweeper)
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    /// HMAC key for code digests. Required outside development.
    #[serde(default)]
    pub hmac_secret: Option<String>,

    /// Echo the plaintext code in the send-otp response (local testing only)
    #[serde(default)]
    pub echo_code_in_response: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            max_attempts: default_max_attempts(),
            max_pending_per_subject: default_max_pending_per_subject(),
            retention_minutes: None,
            sweep_interval_seconds: default_sweep_interval_seconds(),
            hmac_secret: None,
            echo_code_in_response: false,
        }
    }
}

impl OtpConfig {
    /// Retention window in minutes, falling back to the TTL
    pub fn effective_retention_minutes(&self) -> i64 {
        self.retention_minutes.unwrap_or(self.ttl_minutes).max(0)
    }

    /// Resolve the HMAC key for the given environment.
    ///
    /// Returns `Ok(None)` when no key is configured in development.
    pub fn hmac_secret_for(&self, environment: Environment) -> Result<Option<&str>, String> {
        resolve_secret("OTP HMAC secret", self.hmac_secret.as_deref(), environment)
    }

    /// Check the policy values are usable
    pub fn validate(&self, environment: Environment) -> Result<(), String> {
        if self.ttl_minutes <= 0 {
            return Err("otp.ttl_minutes must be positive".to_string());
        }
        if self.ttl_minutes > MAX_TTL_MINUTES {
            return Err(format!("otp.ttl_minutes must be at most {}", MAX_TTL_MINUTES));
        }
        if let Some(retention) = self.retention_minutes {
            if !(0..=MAX_RETENTION_MINUTES).contains(&retention) {
                return Err(format!(
                    "otp.retention_minutes must be between 0 and {}",
                    MAX_RETENTION_MINUTES
                ));
            }
        }
        if self.max_attempts == 0 {
            return Err("otp.max_attempts must be at least 1".to_string());
        }
        if self.max_pending_per_subject == 0 {
            return Err("otp.max_pending_per_subject must be at least 1".to_string());
        }
        if self.echo_code_in_response && environment.is_production() {
            return Err("otp.echo_code_in_response cannot be enabled in production".to_string());
        }
        Ok(())
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// OTP configuration
    #[serde(default)]
    pub otp: OtpConfig,
}

fn resolve_secret<'a>(
    name: &str,
    secret: Option<&'a str>,
    environment: Environment,
) -> Result<Option<&'a str>, String> {
    match secret.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if s.len() < MIN_SECRET_LENGTH => Err(format!(
            "{} must be at least {} bytes",
            name, MIN_SECRET_LENGTH
        )),
        Some(s) => Ok(Some(s)),
        None if environment.is_development() => Ok(None),
        None => Err(format!("{} must be configured in {}", name, environment)),
    }
}

fn default_access_token_expiry_minutes() -> i64 {
    60
}

fn default_issuer() -> String {
    String::from("ournest")
}

fn default_audience() -> String {
    String::from("ournest-api")
}

fn default_ttl_minutes() -> i64 {
    5
}

fn default_max_attempts() -> u32 {
    5
}

fn default_max_pending_per_subject() -> usize {
    3
}

fn default_sweep_interval_seconds() -> u64 {
    60
}
