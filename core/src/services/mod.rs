//! Business services containing domain logic and use cases.

pub mod auth;
pub mod otp;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use otp::{
    Clock, CodeDigester, IssuedCode, ManualClock, NotificationSink, OtpLedger, OtpLedgerConfig,
    OtpSweeper, OtpSweeperConfig, SweepResult, SystemClock, VerifiedChallenge,
};
pub use token::{TokenService, TokenServiceConfig};
