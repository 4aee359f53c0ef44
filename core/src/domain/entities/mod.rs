//! Domain entities representing core business objects.

pub mod challenge;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use challenge::{
    Challenge, ChallengeId, ChallengeState, CodeDigest, OneTimeCode,
    CHALLENGE_ID_BYTES, CODE_LENGTH, DEFAULT_TTL_MINUTES, MAX_ATTEMPTS, MAX_PENDING_PER_SUBJECT,
};
pub use token::{
    AccessToken, Claims, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, TOKEN_TYPE_BEARER,
};
pub use user::User;
