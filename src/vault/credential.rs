//! The credential record stored inside a vault.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A single (service, username, password) record.
///
/// Holds plaintext, so it only exists in memory while the vault is
/// unlocked; its fields are wiped when it is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    /// The service this credential belongs to (unique key, non-empty).
    pub service: String,

    /// The account name at that service.
    pub username: String,

    /// The plaintext password.
    pub password: String,
}

impl Credential {
    pub fn new(
        service: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

// Passwords must not leak through debug formatting.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let cred = Credential::new("email", "alice", "hunter2");
        let rendered = format!("{cred:?}");

        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
