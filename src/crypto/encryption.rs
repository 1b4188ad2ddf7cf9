//! AES-256-GCM authenticated encryption under a password-derived key.
//!
//! Every call to `encrypt` draws a fresh 16-byte salt and 12-byte nonce
//! from the OS random source, so the same plaintext never produces the
//! same blob twice. The GCM tag makes decryption fail closed on any
//! tampering, independent of whether the password was correct.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::crypto::kdf::{derive_key, generate_salt, DEFAULT_ITERATIONS, SALT_LEN};
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes (96 bits, the GCM standard).
pub const NONCE_LEN: usize = 12;

/// An encrypted payload together with the parameters needed to decrypt
/// it again. The salt and nonce are not secret and are persisted next
/// to the ciphertext; the blob is immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under a key derived from `password`.
///
/// Generates a fresh salt and nonce per call; salts and nonces are
/// never reused across encryptions.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<EncryptedBlob> {
    let salt = generate_salt();
    let key = derive_key(password, &salt, DEFAULT_ITERATIONS)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(EncryptedBlob {
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        ciphertext,
    })
}

/// Decrypt a blob produced by `encrypt`, re-deriving the key from the
/// stored salt and the supplied password.
///
/// Field lengths are enforced here, not in the codec: a blob whose salt
/// or nonce has the wrong size can never decrypt, so it is reported the
/// same way as tampered ciphertext.
pub fn decrypt(blob: &EncryptedBlob, password: &str) -> Result<Vec<u8>> {
    if blob.salt.len() != SALT_LEN || blob.nonce.len() != NONCE_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let key = derive_key(password, &blob.salt, DEFAULT_ITERATIONS)?;

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(&blob.nonce), blob.ciphertext.as_slice())
        .map_err(|_| VaultError::DecryptionFailed)
}

/// Returns true iff `password` decrypts `blob`.
///
/// Used against the vault's auth token so a password can be checked
/// without decrypting the full credential store. The recovered
/// plaintext is wiped before returning.
pub fn verify_password(blob: &EncryptedBlob, password: &str) -> bool {
    match decrypt(blob, password) {
        Ok(mut plaintext) => {
            plaintext.zeroize();
            true
        }
        Err(_) => false,
    }
}
