use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use nest_core::{AuthResponse, IssuedChallenge};
use nest_shared::phone::MOBILE_REGEX;
use nest_shared::validation::OTP_CODE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Ten-digit Indian mobile number, no country code (e.g. "9998887777")
    #[validate(regex(
        path = *MOBILE_REGEX,
        message = "Please enter a valid 10-digit Indian mobile number."
    ))]
    pub mobile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Challenge id returned by send-otp
    #[validate(length(min = 1, message = "request_id is required."))]
    pub request_id: String,

    #[validate(regex(
        path = *MOBILE_REGEX,
        message = "Please enter a valid 10-digit Indian mobile number."
    ))]
    pub mobile: String,

    /// 4-digit code
    #[validate(regex(path = *OTP_CODE_REGEX, message = "OTP must be a 4-digit numeric code."))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub request_id: String,
    pub message: String,
    /// Seconds until the code expires
    pub expires_in: i64,
    /// Only present when the server echoes codes (local development)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

impl From<IssuedChallenge> for SendOtpResponse {
    fn from(issued: IssuedChallenge) -> Self {
        Self {
            request_id: issued.challenge_id,
            message: "Verification code has been sent to your phone.".to_string(),
            expires_in: issued.expires_in,
            dev_code: issued.dev_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub mobile: String,
    pub is_new_user: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

impl From<AuthResponse> for VerifyOtpResponse {
    fn from(response: AuthResponse) -> Self {
        Self {
            success: true,
            message: "OTP verified successfully.".to_string(),
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            user: UserSummary {
                id: response.user_id,
                mobile: response.mobile,
                is_new_user: response.is_new_user,
            },
        }
    }
}
