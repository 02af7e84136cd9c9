use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way credential hashing and verification.
///
/// Internally uses Argon2id with a per-call random salt embedded in the
/// PHC-format output string.
pub struct CredentialHasher;

impl CredentialHasher {
    /// Create a new hasher configured with secure defaults.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret for storage.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret to hash
    ///
    /// # Returns
    /// PHC string format digest (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored digest.
    ///
    /// A digest that fails to parse verifies as `false` rather than erroring:
    /// a corrupted record must be indistinguishable from a wrong password to
    /// the caller.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret to verify
    /// * `digest` - Stored digest in PHC string format
    ///
    /// # Returns
    /// True if the secret matches, false otherwise
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::new();
        let secret = "my_secure_password";

        let digest = hasher.hash(secret).expect("Failed to hash secret");

        assert!(hasher.verify(secret, &digest));
        assert!(!hasher.verify("wrong_password", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = CredentialHasher::new();

        let first = hasher.hash("same_secret").expect("Failed to hash secret");
        let second = hasher.hash("same_secret").expect("Failed to hash secret");

        assert_ne!(first, second);
        assert!(hasher.verify("same_secret", &first));
        assert!(hasher.verify("same_secret", &second));
    }

    #[test]
    fn test_verify_malformed_digest_is_mismatch() {
        let hasher = CredentialHasher::new();

        assert!(!hasher.verify("password", "not_a_phc_string"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$argon2id$truncated"));
    }

    #[test]
    fn test_empty_secret_round_trips() {
        let hasher = CredentialHasher::new();

        let digest = hasher.hash("").expect("Failed to hash empty secret");

        assert!(hasher.verify("", &digest));
        assert!(!hasher.verify("anything", &digest));
    }

    #[test]
    fn test_long_secret_round_trips() {
        let hasher = CredentialHasher::new();
        let secret = "x".repeat(4096);

        let digest = hasher.hash(&secret).expect("Failed to hash long secret");

        assert!(hasher.verify(&secret, &digest));
        assert!(!hasher.verify(&secret[..4095], &digest));
    }
}
