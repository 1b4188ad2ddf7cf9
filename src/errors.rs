use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in passvault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    /// The KDF primitive itself failed. Unlike a wrong password this is
    /// not recoverable by re-prompting; continuing with a partial or
    /// zero key would be unsafe.
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or tampered data")]
    DecryptionFailed,

    // --- Format errors ---
    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),

    // --- Vault errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for passvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
