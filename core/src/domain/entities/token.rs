//! Token entities for JWT-based session issuance.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Access token expiration time (60 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// JWT issuer
pub const JWT_ISSUER: &str = "ournest";

/// JWT audience
pub const JWT_AUDIENCE: &str = "ournest-api";

/// Token type reported to clients
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (verified mobile number)
    pub sub: String,

    /// User ID
    pub uid: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user` - The signed-in user
    /// * `issued_at` - Issue instant
    /// * `expiry_minutes` - Token lifetime in minutes
    /// * `issuer` / `audience` - Values checked on verification
    pub fn new_access_token(
        user: &User,
        issued_at: DateTime<Utc>,
        expiry_minutes: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let expiry = issued_at + Duration::minutes(expiry_minutes);

        Self {
            sub: user.mobile.clone(),
            uid: user.id.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.uid)
    }
}

/// Signed access token handed back after a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Encoded JWT
    pub token: String,

    /// Always `bearer`
    pub token_type: String,

    /// Lifetime in seconds
    pub expires_in: i64,
}

impl AccessToken {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}
