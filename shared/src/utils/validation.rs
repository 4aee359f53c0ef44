//! Format checks applied to request fields

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern accepted for one-time codes
pub const OTP_CODE_PATTERN: &str = r"^\d{4}$";

/// Compiled [`OTP_CODE_PATTERN`]
pub static OTP_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(OTP_CODE_PATTERN).expect("otp code pattern is a valid regex"));
