//! Salted password hashing for user entities.
//!
//! Users carry a salted SHA-256 hash as their entity secret, with the
//! salt stored under a reserved metadata key. Verification compares in
//! constant time; plaintext is never stored or compared directly.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Salt length in bytes before hex encoding.
const SALT_BYTES: usize = 16;

/// Generate a fresh random salt, hex-encoded.
///
/// Uses the operating system CSPRNG.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a password with the given salt.
///
/// # Returns
///
/// Hex-encoded `SHA-256(salt || plaintext)`.
pub fn hash_password(salt: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password attempt against a stored hash.
///
/// The attempt is hashed with the stored salt and compared to the stored
/// hash in constant time.
pub fn verify_password(salt: &str, attempt: &str, stored_hash: &str) -> bool {
    let computed = hash_password(salt, attempt);
    if computed.len() != stored_hash.len() {
        return false;
    }
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let salt = "00ff";
        assert_eq!(hash_password(salt, "secret"), hash_password(salt, "secret"));
        assert_ne!(hash_password(salt, "secret"), hash_password("ff00", "secret"));
    }

    #[test]
    fn test_verify() {
        let salt = generate_salt();
        let stored = hash_password(&salt, "hunter2");

        assert!(verify_password(&salt, "hunter2", &stored));
        assert!(!verify_password(&salt, "hunter3", &stored));
        assert!(!verify_password(&salt, "hunter2", "not-a-hash"));
    }
}
