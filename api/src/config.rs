//! Configuration loading for the API binary
//!
//! Layers, lowest precedence first:
//! 1. built-in defaults (per environment)
//! 2. optional `config/{environment}.toml`
//! 3. `OURNEST__*` environment variables, `__` separating nested keys
//!    (e.g. `OURNEST__AUTH__OTP__TTL_MINUTES=10`)
//! 4. the short names `OTP_HMAC_SECRET`, `JWT_SECRET`, `SERVER_HOST` and
//!    `SERVER_PORT`
//!
//! `ENVIRONMENT` (or `ENV`) selects the environment.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

use nest_shared::{AppConfig, Environment, LoggingConfig};

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "OURNEST";

/// Bytes of entropy in a generated development secret
const EPHEMERAL_SECRET_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from `.env`, the config file and the process environment
pub fn load() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let vars: HashMap<String, String> = std::env::vars().collect();
    load_from_vars(&vars)
}

/// Load configuration using `vars` in place of the process environment
pub fn load_from_vars(vars: &HashMap<String, String>) -> Result<AppConfig, ConfigError> {
    let environment = environment_from_vars(vars)?;
    let logging = LoggingConfig::for_environment(environment);

    let settings = config::Config::builder()
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format.as_str())?
        .add_source(config::File::with_name(environment.config_file()).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(Some(vars.clone())),
        )
        .set_override("environment", environment.to_string())?
        .set_override_option("auth.otp.hmac_secret", vars.get("OTP_HMAC_SECRET").cloned())?
        .set_override_option("auth.jwt.secret", vars.get("JWT_SECRET").cloned())?
        .set_override_option("server.host", vars.get("SERVER_HOST").cloned())?
        .set_override_option("server.port", vars.get("SERVER_PORT").cloned())?
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate().map_err(ConfigError::Invalid)?;

    Ok(app_config)
}

fn environment_from_vars(vars: &HashMap<String, String>) -> Result<Environment, ConfigError> {
    match vars.get("ENVIRONMENT").or_else(|| vars.get("ENV")) {
        Some(name) => name.parse().map_err(ConfigError::Invalid),
        None => Ok(Environment::default()),
    }
}

/// Signing and digest secrets resolved for the running environment
pub struct Secrets {
    pub otp_hmac_key: String,
    pub jwt_secret: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("otp_hmac_key", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

/// Resolve the OTP HMAC key and JWT secret.
///
/// Outside development a missing secret is an error. In development a random
/// secret is generated for this process, so codes and tokens do not survive
/// a restart.
pub fn resolve_secrets(config: &AppConfig) -> Result<Secrets, ConfigError> {
    let environment = config.environment;

    let otp_hmac_key = match config
        .auth
        .otp
        .hmac_secret_for(environment)
        .map_err(ConfigError::Invalid)?
    {
        Some(secret) => secret.to_string(),
        None => ephemeral_secret("auth.otp.hmac_secret"),
    };

    let jwt_secret = match config
        .auth
        .jwt
        .secret_for(environment)
        .map_err(ConfigError::Invalid)?
    {
        Some(secret) => secret.to_string(),
        None => ephemeral_secret("auth.jwt.secret"),
    };

    Ok(Secrets {
        otp_hmac_key,
        jwt_secret,
    })
}

fn ephemeral_secret(name: &str) -> String {
    tracing::warn!(
        setting = name,
        event = "ephemeral_secret_generated",
        "No secret configured; generated a random one for this process"
    );
    let mut bytes = [0u8; EPHEMERAL_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_shared::LogFormat;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_in_development() {
        let config = load_from_vars(&HashMap::new()).unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.otp.ttl_minutes, 5);
        assert_eq!(config.auth.otp.max_attempts, 5);
        assert_eq!(config.auth.otp.max_pending_per_subject, 3);
        assert_eq!(config.auth.otp.sweep_interval_seconds, 60);
        assert_eq!(config.auth.jwt.access_token_expiry_minutes, 60);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = load_from_vars(&vars(&[
            ("OURNEST__AUTH__OTP__TTL_MINUTES", "10"),
            ("OURNEST__AUTH__OTP__MAX_PENDING_PER_SUBJECT", "5"),
            ("OURNEST__LOGGING__FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.auth.otp.ttl_minutes, 10);
        assert_eq!(config.auth.otp.max_pending_per_subject, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_short_names_are_honoured() {
        let config = load_from_vars(&vars(&[
            ("OTP_HMAC_SECRET", "otp-secret-for-tests-0123"),
            ("JWT_SECRET", "jwt-secret-for-tests-0123"),
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9090"),
        ]))
        .unwrap();

        assert_eq!(
            config.auth.otp.hmac_secret.as_deref(),
            Some("otp-secret-for-tests-0123")
        );
        assert_eq!(config.auth.jwt.secret.as_deref(), Some("jwt-secret-for-tests-0123"));
        assert_eq!(config.server.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_production_without_hmac_key_fails() {
        let result = load_from_vars(&vars(&[
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "jwt-secret-for-tests-0123"),
        ]));

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_production_with_secrets_loads() {
        let config = load_from_vars(&vars(&[
            ("ENVIRONMENT", "production"),
            ("OTP_HMAC_SECRET", "otp-secret-for-tests-0123"),
            ("JWT_SECRET", "jwt-secret-for-tests-0123"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.logging.format, LogFormat::Json);

        let secrets = resolve_secrets(&config).unwrap();
        assert_eq!(secrets.otp_hmac_key, "otp-secret-for-tests-0123");
        assert_eq!(secrets.jwt_secret, "jwt-secret-for-tests-0123");
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let result = load_from_vars(&vars(&[("ENVIRONMENT", "moon")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_development_generates_ephemeral_secrets() {
        let config = load_from_vars(&HashMap::new()).unwrap();

        let first = resolve_secrets(&config).unwrap();
        let second = resolve_secrets(&config).unwrap();

        assert_eq!(first.otp_hmac_key.len(), EPHEMERAL_SECRET_BYTES * 2);
        assert_ne!(first.otp_hmac_key, second.otp_hmac_key);
        assert_ne!(first.otp_hmac_key, first.jwt_secret);
        assert!(!format!("{:?}", first).contains(&first.jwt_secret));
    }

    #[test]
    fn test_echo_code_rejected_in_production() {
        let result = load_from_vars(&vars(&[
            ("ENVIRONMENT", "production"),
            ("OTP_HMAC_SECRET", "otp-secret-for-tests-0123"),
            ("JWT_SECRET", "jwt-secret-for-tests-0123"),
            ("OURNEST__AUTH__OTP__ECHO_CODE_IN_RESPONSE", "true"),
        ]));

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
