//! Generation of one-time codes and challenge identifiers.
//!
//! Both draw from the operating system CSPRNG.

use rand::{rngs::OsRng, Rng, RngCore};

use crate::domain::entities::challenge::{ChallengeId, OneTimeCode, CHALLENGE_ID_BYTES, CODE_LENGTH};

/// Exclusive upper bound of the code space (10^CODE_LENGTH)
const CODE_SPACE: u32 = 10u32.pow(CODE_LENGTH as u32);

/// Uniform code in `0000..=9999`, leading zeros preserved
pub fn generate_code() -> OneTimeCode {
    let value = OsRng.gen_range(0..CODE_SPACE);
    OneTimeCode::new(format!("{:0width$}", value, width = CODE_LENGTH))
}

/// 128-bit random identifier rendered as 32 lowercase hex characters
pub fn generate_challenge_id() -> ChallengeId {
    let mut bytes = [0u8; CHALLENGE_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    ChallengeId::new(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_format() {
        for _ in 0..500 {
            let code = generate_code();
            assert_eq!(code.as_str().len(), 4);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_leading_zeros_are_preserved() {
        assert_eq!(format!("{:0width$}", 7, width = CODE_LENGTH), "0007");
        assert_eq!(CODE_SPACE, 10_000);
    }

    #[test]
    fn test_codes_vary() {
        let codes: HashSet<String> = (0..200).map(|_| generate_code().into_inner()).collect();
        assert!(codes.len() > 100);
    }

    #[test]
    fn test_challenge_id_format_and_uniqueness() {
        let ids: HashSet<String> = (0..1000)
            .map(|_| generate_challenge_id().into_inner())
            .collect();

        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert_eq!(id.len(), 32);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
