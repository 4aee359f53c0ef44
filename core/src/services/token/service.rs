//! Main token service implementation

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use nest_shared::config::auth::MIN_SECRET_LENGTH;

use crate::domain::entities::token::{AccessToken, Claims};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Service issuing and verifying HS256 access tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `DomainError::Validation` if the secret is
    /// shorter than the accepted minimum
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(DomainError::Validation {
                message: format!("JWT secret must be at least {} bytes", MIN_SECRET_LENGTH),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues an access token whose subject is the user's verified mobile
    ///
    /// # Returns
    ///
    /// * `Ok(AccessToken)` - Signed bearer token and its lifetime
    /// * `Err(DomainError::Token(TokenGenerationFailed))` - Encoding failed
    pub fn issue_access_token(&self, user: &User) -> Result<AccessToken, DomainError> {
        let claims = Claims::new_access_token(
            user,
            Utc::now(),
            self.config.access_token_expiry_minutes,
            &self.config.issuer,
            &self.config.audience,
        );
        let token = self.encode_jwt(&claims)?;

        tracing::debug!(
            user_id = %user.id,
            jti = %claims.jti,
            event = "access_token_issued",
            "Issued access token"
        );

        Ok(AccessToken::bearer(
            token,
            self.config.access_token_expiry_seconds(),
        ))
    }

    /// Verifies signature, issuer, audience, `exp` and `nbf`
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims
    /// * `Err(DomainError::Token(TokenExpired))` - Token past its expiry
    /// * `Err(DomainError::Token(InvalidToken))` - Any other validation failure
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                _ => DomainError::Token(TokenError::InvalidToken),
            })
    }

    /// Signs arbitrary claims with the service key
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, event = "token_encoding_failed", "Failed to encode JWT");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }
}
