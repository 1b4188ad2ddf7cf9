//! On-disk vault file layout.
//!
//! A vault file has this layout:
//!
//! ```text
//! [PVLT: 4 bytes][version: 1 byte][auth token blob][credentials blob]
//! ```
//!
//! Both blobs use the length-prefixed codec format and are therefore
//! self-delimiting, so no extra framing sits between them. The auth
//! token always comes first: unlocking verifies the password against it
//! before paying for the full credentials decrypt.

use std::fs;
use std::path::Path;

use crate::crypto::EncryptedBlob;
use crate::errors::{Result, VaultError};

use super::codec;

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version).
const PREFIX_LEN: usize = 5;

/// Write a vault file to disk atomically.
///
/// The bytes go to a temp file in the same directory which is then
/// renamed over the target, so a crash mid-save leaves the previous
/// vault intact and readers never see a half-written file.
pub fn write_vault(
    path: &Path,
    auth_token: &EncryptedBlob,
    credentials: &EncryptedBlob,
) -> Result<()> {
    let auth_bytes = codec::serialize(auth_token)?;
    let cred_bytes = codec::serialize(credentials)?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + auth_bytes.len() + cred_bytes.len());
    buf.extend_from_slice(MAGIC);
    buf.push(CURRENT_VERSION);
    buf.extend_from_slice(&auth_bytes);
    buf.extend_from_slice(&cred_bytes);

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Read a vault file and return its (auth token, credentials) blobs.
pub fn read_vault(path: &Path) -> Result<(EncryptedBlob, EncryptedBlob)> {
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    if data.len() < PREFIX_LEN {
        return Err(VaultError::InvalidFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(VaultError::InvalidFormat(
            "missing PVLT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(VaultError::InvalidFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let mut offset = PREFIX_LEN;
    let auth_token = codec::read_blob(&data, &mut offset)?;
    let credentials = codec::read_blob(&data, &mut offset)?;

    Ok((auth_token, credentials))
}
