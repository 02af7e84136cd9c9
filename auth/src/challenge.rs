//! Opaque challenge-token generation.
//!
//! Challenge tokens are high-entropy random strings, not signed structured
//! tokens: they must be single-use and revocable by clearing the stored
//! value, which a stateless signed token cannot support without a
//! revocation list.

use rand::rngs::OsRng;
use rand::Rng;

/// Number of alphanumeric characters in a generated token (~190 bits).
const TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric challenge token.
pub fn generate_token() -> String {
    let mut rng = OsRng;

    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..62);
            match idx {
                0..=25 => (b'A' + idx) as char,
                26..=51 => (b'a' + (idx - 26)) as char,
                _ => (b'0' + (idx - 52)) as char,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        let token = generate_token();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = generate_token();
        let second = generate_token();

        assert_ne!(first, second);
    }
}
