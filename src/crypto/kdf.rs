//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! PBKDF2 stretches a low-entropy master password into a 256-bit key by
//! iterating an HMAC over the password and a random salt, making
//! brute-force and dictionary attacks proportionally more expensive.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from a password and salt.
///
/// Deterministic: the same (password, salt, iterations) triple always
/// produces the same key. An iteration count of zero is rejected rather
/// than silently producing a weak key.
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    if iterations == 0 {
        return Err(VaultError::KeyDerivationFailed(
            "iteration count must be at least 1".into(),
        ));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);

    let derived = DerivedKey::new(key);
    key.zeroize();
    Ok(derived)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// A wrapper around a derived 32-byte key that zeroes its memory when
/// dropped, so key material cannot linger after use.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a new `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_random() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        assert_eq!(salt1.len(), SALT_LEN);
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn derivation_is_deterministic() {
        let salt = generate_salt();

        let key1 = derive_key("consistent-password", &salt, 1_000).unwrap();
        let key2 = derive_key("consistent-password", &salt, 1_000).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_inputs_produce_different_keys() {
        let salt1 = generate_salt();
        let salt2 = generate_salt();

        let base = derive_key("password", &salt1, 1_000).unwrap();
        let other_salt = derive_key("password", &salt2, 1_000).unwrap();
        let other_password = derive_key("passwore", &salt1, 1_000).unwrap();
        let other_iterations = derive_key("password", &salt1, 1_001).unwrap();

        assert_ne!(base.as_bytes(), other_salt.as_bytes());
        assert_ne!(base.as_bytes(), other_password.as_bytes());
        assert_ne!(base.as_bytes(), other_iterations.as_bytes());
    }

    #[test]
    fn zero_iterations_rejected() {
        let salt = generate_salt();
        let result = derive_key("password", &salt, 0);
        assert!(matches!(result, Err(VaultError::KeyDerivationFailed(_))));
    }
}
