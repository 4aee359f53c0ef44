//! Main authentication service implementation

use std::sync::Arc;

use nest_shared::phone::{is_valid_mobile, mask_phone_number};

use crate::domain::value_objects::{AuthResponse, IssuedChallenge};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::otp::{NotificationSink, OtpLedger};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authentication service for the OTP sign-in flow
///
/// Orchestrates issue → notify and verify → upsert user → issue token.
pub struct AuthService<U, N>
where
    U: UserRepository,
    N: NotificationSink,
{
    /// User repository for persistence
    user_repository: Arc<U>,
    /// Outbound channel for one-time codes
    notification_sink: Arc<N>,
    /// Challenge ledger
    ledger: Arc<OtpLedger>,
    /// Token service for JWT issuance
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, N> AuthService<U, N>
where
    U: UserRepository,
    N: NotificationSink,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `notification_sink` - Delivery channel for one-time codes
    /// * `ledger` - Shared OTP ledger
    /// * `token_service` - Service for JWT token issuance
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        notification_sink: Arc<N>,
        ledger: Arc<OtpLedger>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            notification_sink,
            ledger,
            token_service,
            config,
        }
    }

    pub fn ledger(&self) -> &Arc<OtpLedger> {
        &self.ledger
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Issue a one-time code for `mobile` and hand it to the notification sink
    ///
    /// This method:
    /// 1. Validates the mobile number format
    /// 2. Issues a challenge (rate limited per number)
    /// 3. Sends the code, outside the ledger lock; failure is only logged
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedChallenge)` - Challenge id and expiry (plus the code in echo mode)
    /// * `Err(DomainError::Auth(InvalidSubjectFormat))` - Malformed mobile number
    /// * `Err(DomainError::Otp(TooManyRequests))` - Too many pending codes
    pub async fn send_otp(&self, mobile: &str) -> DomainResult<IssuedChallenge> {
        if !is_valid_mobile(mobile) {
            return Err(DomainError::Auth(AuthError::InvalidSubjectFormat {
                mobile: mask_phone_number(mobile),
            }));
        }

        let issued = self.ledger.issue(mobile)?;

        match self
            .notification_sink
            .send_code(mobile, issued.code.as_str())
            .await
        {
            Ok(message_id) => tracing::info!(
                mobile = %mask_phone_number(mobile),
                challenge_id = %issued.challenge_id,
                message_id = %message_id,
                event = "otp_sent",
                "Delivered OTP to notification sink"
            ),
            Err(e) => tracing::warn!(
                mobile = %mask_phone_number(mobile),
                challenge_id = %issued.challenge_id,
                error = %e,
                event = "otp_delivery_failed",
                "Notification sink failed; challenge remains valid"
            ),
        }

        let expires_in = issued.expires_in_seconds();
        let dev_code = self
            .config
            .echo_code_in_response
            .then(|| issued.code.as_str().to_string());

        Ok(IssuedChallenge {
            challenge_id: issued.challenge_id.into_inner(),
            expires_at: issued.expires_at,
            expires_in,
            dev_code,
        })
    }

    /// Verify a code and sign the user in
    ///
    /// This method:
    /// 1. Verifies the code against the ledger (consumes it on success)
    /// 2. Rejects inactive accounts
    /// 3. Creates the user on first sign-in, otherwise refreshes last login
    /// 4. Issues an access token
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Access token and user summary
    /// * `Err(DomainError::Otp(_))` - Protocol rejection
    /// * `Err(DomainError::Auth(UserInactive))` - Account disabled
    pub async fn verify_otp(
        &self,
        challenge_id: &str,
        mobile: &str,
        code: &str,
    ) -> DomainResult<AuthResponse> {
        self.ledger.verify(challenge_id, mobile, code)?;

        if let Some(existing) = self.user_repository.find_by_mobile(mobile).await? {
            if !existing.is_active {
                tracing::warn!(
                    mobile = %mask_phone_number(mobile),
                    user_id = %existing.id,
                    event = "login_rejected_inactive",
                    "Inactive user attempted to sign in"
                );
                return Err(DomainError::Auth(AuthError::UserInactive));
            }
        }

        let login = self.user_repository.upsert_login(mobile).await?;
        let token = self.token_service.issue_access_token(&login.user)?;

        tracing::info!(
            mobile = %mask_phone_number(mobile),
            user_id = %login.user.id,
            is_new_user = login.is_new,
            event = "login_success",
            "User signed in"
        );

        Ok(AuthResponse::from_token(token, &login.user, login.is_new))
    }
}
