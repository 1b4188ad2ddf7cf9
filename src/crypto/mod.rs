//! Cryptographic primitives for passvault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - AES-256-GCM authenticated encryption and decryption (`encryption`)

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, verify_password, ...};
pub use encryption::{decrypt, encrypt, verify_password, EncryptedBlob, NONCE_LEN};
pub use kdf::{derive_key, generate_salt, DerivedKey, DEFAULT_ITERATIONS, KEY_LEN, SALT_LEN};
