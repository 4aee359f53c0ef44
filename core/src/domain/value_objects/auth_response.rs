//! Value objects returned by the sign-in flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::AccessToken;
use crate::domain::entities::user::User;

/// Outcome of a successful `send_otp`
///
/// `dev_code` is only populated when the development echo flag is on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuedChallenge {
    /// Opaque identifier the client sends back on verification
    pub challenge_id: String,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Seconds until `expires_at`
    pub expires_in: i64,

    /// Plaintext code, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Authentication response containing the access token and user metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token scheme, always `bearer`
    pub token_type: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Signed-in user's identifier
    pub user_id: Uuid,

    /// Signed-in user's mobile number
    pub mobile: String,

    /// Whether this sign-in created the account
    pub is_new_user: bool,
}

impl AuthResponse {
    /// Creates an authentication response from an issued token and the user
    pub fn from_token(token: AccessToken, user: &User, is_new_user: bool) -> Self {
        Self {
            access_token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user_id: user.id,
            mobile: user.mobile.clone(),
            is_new_user,
        }
    }
}
