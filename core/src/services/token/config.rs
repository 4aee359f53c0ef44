//! Configuration for the token service

use nest_shared::JwtConfig;

use crate::domain::entities::token::{ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER};

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_expiry_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
        }
    }

    /// Build from the shared JWT settings with an already resolved secret
    pub fn from_jwt_config(config: &JwtConfig, jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_expiry_minutes", &self.access_token_expiry_minutes)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}
