//! Flat binary encoding of an `EncryptedBlob`.
//!
//! Layout (all length prefixes are little-endian u32):
//!
//! ```text
//! [salt_len][salt][nonce_len][nonce][ciphertext_len][ciphertext]
//! ```
//!
//! The codec treats every field as an opaque byte string. It does not
//! know or care that the salt is 16 bytes and the nonce 12 — those
//! constraints belong to the cipher layer at decrypt time.

use crate::crypto::EncryptedBlob;
use crate::errors::{Result, VaultError};

/// Minimum size of a serialized blob: three zero-length fields.
pub const MIN_BLOB_LEN: usize = 12;

/// Serialize a blob into the length-prefixed wire format.
pub fn serialize(blob: &EncryptedBlob) -> Result<Vec<u8>> {
    let total = MIN_BLOB_LEN + blob.salt.len() + blob.nonce.len() + blob.ciphertext.len();
    let mut out = Vec::with_capacity(total);

    write_field(&mut out, &blob.salt)?;
    write_field(&mut out, &blob.nonce)?;
    write_field(&mut out, &blob.ciphertext)?;

    Ok(out)
}

/// Deserialize a blob from the start of `data`.
///
/// Trailing bytes after the third field are ignored; use `read_blob`
/// when consecutive blobs share one buffer.
pub fn deserialize(data: &[u8]) -> Result<EncryptedBlob> {
    let mut offset = 0;
    read_blob(data, &mut offset)
}

/// Read one blob starting at `*offset`, advancing it past the bytes
/// consumed. Fails with a format error if the stream is shorter than
/// any declared length implies, or shorter than the 12-byte minimum.
pub fn read_blob(data: &[u8], offset: &mut usize) -> Result<EncryptedBlob> {
    if data.len().saturating_sub(*offset) < MIN_BLOB_LEN {
        return Err(VaultError::InvalidFormat(
            "blob shorter than the 12-byte minimum".into(),
        ));
    }

    let salt = read_field(data, offset)?;
    let nonce = read_field(data, offset)?;
    let ciphertext = read_field(data, offset)?;

    Ok(EncryptedBlob {
        salt,
        nonce,
        ciphertext,
    })
}

fn write_field(out: &mut Vec<u8>, field: &[u8]) -> Result<()> {
    let len = u32::try_from(field.len()).map_err(|_| {
        VaultError::InvalidFormat(format!("field length {} exceeds u32::MAX", field.len()))
    })?;

    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(field);
    Ok(())
}

fn read_field(data: &[u8], offset: &mut usize) -> Result<Vec<u8>> {
    let prefix = data
        .get(*offset..*offset + 4)
        .ok_or_else(|| VaultError::InvalidFormat("truncated length prefix".into()))?;

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len_bytes) as usize;
    *offset += 4;

    let end = offset
        .checked_add(len)
        .ok_or_else(|| VaultError::InvalidFormat("field length overflows offset".into()))?;
    let bytes = data.get(*offset..end).ok_or_else(|| {
        VaultError::InvalidFormat(format!("declared field length {len} exceeds remaining data"))
    })?;
    *offset = end;

    Ok(bytes.to_vec())
}
