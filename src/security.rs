//! Best-effort erasure of secrets from memory.
//!
//! Overwrites go through `zeroize`, which guarantees the compiler does
//! not optimize them away. This cannot reach copies the allocator or
//! the OS may already have made — reallocated buffers, swapped pages,
//! core dumps — so it narrows the exposure window rather than promising
//! secrecy.

use zeroize::Zeroize;

// Callers hold prompted passwords and plaintext payloads in `Zeroizing`
// so they are wiped on drop even on early-return paths.
pub use zeroize::Zeroizing;

/// Overwrite every byte of `secret` with zero.
pub fn erase_in_place(secret: &mut [u8]) {
    secret.zeroize();
}

/// Overwrite a string's buffer with zeros and truncate it to empty.
pub fn erase_string(secret: &mut String) {
    secret.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erase_in_place_zeroes_the_buffer() {
        let mut buf = vec![0xAAu8; 32];
        erase_in_place(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn erase_string_empties_the_string() {
        let mut secret = String::from("hunter2");
        erase_string(&mut secret);
        assert!(secret.is_empty());
    }
}
