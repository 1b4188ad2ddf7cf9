//! In-memory credential map and its plaintext payload encoding.
//!
//! The store is rebuilt from the decrypted payload on every unlock and
//! discarded on lock. `encode` produces the exact bytes that become the
//! vault's credentials ciphertext.

use std::collections::BTreeMap;

use crate::errors::{Result, VaultError};

use super::credential::Credential;

/// Mapping of service name to credential, keyed uniquely by service.
///
/// A `BTreeMap` keeps the keys in lexicographic order, which is a
/// stated contract of `services()`: listings must be deterministic
/// across runs regardless of insertion order.
#[derive(Default)]
pub struct CredentialStore {
    entries: BTreeMap<String, Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record keyed by `service`.
    ///
    /// Service validation happens upstream in the controller; the store
    /// accepts whatever key it is given.
    pub fn upsert(&mut self, service: &str, username: &str, password: &str) {
        self.entries.insert(
            service.to_string(),
            Credential::new(service, username, password),
        );
    }

    pub fn get(&self, service: &str) -> Option<&Credential> {
        self.entries.get(service)
    }

    /// Remove the record for `service`. Returns false if absent.
    pub fn remove(&mut self, service: &str) -> bool {
        self.entries.remove(service).is_some()
    }

    /// All service names in lexicographic order.
    pub fn services(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every record, wiping each credential's plaintext.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Encode the full map as the plaintext payload that gets encrypted.
    ///
    /// JSON escapes embedded newlines, colons, and separator-looking
    /// values, so a credential can never corrupt the payload the way
    /// line-anchored formats do. Records are emitted sorted by service.
    pub fn encode(&self) -> Result<String> {
        let records: Vec<&Credential> = self.entries.values().collect();
        serde_json::to_string(&records)
            .map_err(|e| VaultError::InvalidFormat(format!("payload encode: {e}")))
    }

    /// Inverse of `encode`. Clears existing state first; any parse
    /// failure is a hard error that leaves the store empty rather than
    /// silently half-populated.
    pub fn decode(&mut self, payload: &str) -> Result<()> {
        self.entries.clear();

        let records: Vec<Credential> = serde_json::from_str(payload)
            .map_err(|e| VaultError::InvalidFormat(format!("payload decode: {e}")))?;

        for cred in records {
            if cred.service.is_empty() {
                self.entries.clear();
                return Err(VaultError::InvalidFormat(
                    "record with empty service name".into(),
                ));
            }
            self.entries.insert(cred.service.clone(), cred);
        }

        Ok(())
    }
}
