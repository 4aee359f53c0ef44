//! Configuration for the authentication service

use nest_shared::OtpConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone, Default)]
pub struct AuthServiceConfig {
    /// Return the plaintext code from `send_otp` (development only)
    pub echo_code_in_response: bool,
}

impl From<&OtpConfig> for AuthServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            echo_code_in_response: config.echo_code_in_response,
        }
    }
}
