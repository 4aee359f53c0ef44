//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT issuance and OTP challenge policy
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, OtpConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Baseline configuration for an environment, before file and env overrides
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        self.auth.otp.validate(self.environment)?;
        self.auth.otp.hmac_secret_for(self.environment)?;
        self.auth.jwt.secret_for(self.environment)?;
        if self.auth.jwt.access_token_expiry_minutes <= 0 {
            return Err("auth.jwt.access_token_expiry_minutes must be positive".to_string());
        }
        Ok(())
    }
}
