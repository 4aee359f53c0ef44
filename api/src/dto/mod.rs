pub mod auth;

pub use auth::{SendOtpRequest, SendOtpResponse, UserSummary, VerifyOtpRequest, VerifyOtpResponse};
