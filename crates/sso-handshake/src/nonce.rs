// Nonce generation for outbound SSO payloads.
//
// A nonce is a 130-bit random integer rendered in radix 32 (digits 0-9a-v)
// without leading zeros, so it is at most 26 characters long.

use rand::Rng;

/// Radix-32 digit set.
const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

/// 26 digits of 5 bits each.
const NONCE_DIGITS: usize = 26;

/// Generate a fresh nonce from the thread-local CSPRNG.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    let raw: String = (0..NONCE_DIGITS)
        .map(|_| DIGITS[rng.gen_range(0..DIGITS.len())] as char)
        .collect();

    let trimmed = raw.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_bound() {
        for _ in 0..200 {
            let nonce = generate_nonce();
            assert!(!nonce.is_empty());
            assert!(nonce.len() <= NONCE_DIGITS);
        }
    }

    #[test]
    fn test_valid_characters() {
        for _ in 0..200 {
            let nonce = generate_nonce();
            assert!(
                nonce.bytes().all(|b| DIGITS.contains(&b)),
                "Invalid nonce: {nonce}"
            );
        }
    }

    #[test]
    fn test_no_leading_zero() {
        for _ in 0..200 {
            let nonce = generate_nonce();
            assert!(nonce == "0" || !nonce.starts_with('0'));
        }
    }

    #[test]
    fn test_uniqueness() {
        let nonces: HashSet<String> = (0..1000).map(|_| generate_nonce()).collect();
        assert_eq!(nonces.len(), 1000);
    }
}
