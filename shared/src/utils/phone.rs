//! Mobile number utilities
//!
//! Sign-in is restricted to Indian mobile numbers: ten digits starting with 6-9.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern accepted for sign-in mobile numbers
pub const MOBILE_PATTERN: &str = r"^[6-9]\d{9}$";

/// Compiled [`MOBILE_PATTERN`]
pub static MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(MOBILE_PATTERN).expect("mobile pattern is a valid regex"));

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check if a mobile number is valid for sign-in (exact match, no normalization)
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(mobile)
}

/// Mask a phone number for logs and display (e.g., 98****7777)
pub fn mask_phone_number(phone: &str) -> String {
    let digits = normalize_phone_number(phone);
    if digits.len() >= 7 {
        format!("{}****{}", &digits[0..2], &digits[digits.len() - 4..])
    } else {
        "****".to_string()
    }
}
