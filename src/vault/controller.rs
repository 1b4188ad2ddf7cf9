//! The lock/unlock state machine that owns the master password.
//!
//! A controller is in one of three states: no vault file exists yet,
//! locked (file exists, nothing sensitive in memory), or unlocked (an
//! active session holds the master password and the decrypted store).
//!
//! Every state transition and every control-flow read goes through one
//! mutex, so the idle-timeout worker can call `lock()` from its own
//! thread without interleaving with a half-finished add/remove/save on
//! the foreground thread.
//!
//! Public methods follow a fail-closed convention: they report success
//! or failure as booleans (or empty results) so the shell can simply
//! re-prompt, and never surface an error value past this boundary. The
//! fallible logic lives in `Result`-returning internals, where a KDF
//! primitive failure stays distinguishable from a wrong password.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::crypto::{self, EncryptedBlob};
use crate::errors::{Result, VaultError};
use crate::security::Zeroizing;

use super::credential::Credential;
use super::file;
use super::store::CredentialStore;

/// Fixed plaintext encrypted into the auth token at vault creation.
/// Decrypting it successfully proves the password is correct without
/// touching the credentials blob.
const AUTH_CHECK_PLAINTEXT: &[u8] = b"VAULT_AUTH_CHECK";

/// An unlocked session: the master password plus the decrypted store.
///
/// The auth token rides along because every save rewrites the whole
/// file and the token must be persisted verbatim — it is created once
/// at vault initialization and never regenerated.
struct Session {
    master_password: Zeroizing<String>,
    auth_token: EncryptedBlob,
    store: CredentialStore,
}

impl Drop for Session {
    fn drop(&mut self) {
        // The Zeroizing wrapper wipes the password; the store's records
        // wipe themselves as they drop. Clearing here keeps the wipe on
        // the lock path even if a Credential ever loses its drop guard.
        self.store.clear();
    }
}

/// The vault controller. Cheap to share behind an `Arc`; all methods
/// take `&self`.
pub struct VaultController {
    path: PathBuf,
    session: Mutex<Option<Session>>,
}

impl VaultController {
    /// Create a controller for the vault file at `path`. No I/O happens
    /// here; the initial state is simply whether the file exists.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: Mutex::new(None),
        }
    }

    /// Path to the vault file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a vault file exists on disk.
    pub fn vault_exists(&self) -> bool {
        self.path.exists()
    }

    /// Whether the vault is currently locked. A vault with no file yet
    /// also reports locked.
    pub fn is_locked(&self) -> bool {
        self.guard().is_none()
    }

    /// Create a brand-new vault protected by `password`.
    ///
    /// Refuses to clobber an existing vault file. On success the auth
    /// token is generated, an empty store is persisted, and the vault
    /// is left unlocked.
    pub fn initialize_vault(&self, password: &str) -> bool {
        let mut guard = self.guard();
        if guard.is_some() {
            return false;
        }

        match self.try_initialize(password) {
            Ok(session) => {
                *guard = Some(session);
                true
            }
            Err(_) => false,
        }
    }

    /// Unlock the vault with `password`.
    ///
    /// Verifies the password against the on-disk auth token first, then
    /// decrypts and decodes the credentials blob. A failed attempt
    /// leaves the vault locked and retains nothing of the password.
    pub fn unlock(&self, password: &str) -> bool {
        let mut guard = self.guard();
        if guard.is_some() {
            return true;
        }

        match self.try_unlock(password) {
            Ok(session) => {
                *guard = Some(session);
                true
            }
            Err(_) => false,
        }
    }

    /// Lock the vault, wiping the master password and every decrypted
    /// credential from memory. Idempotent: locking an already-locked
    /// vault is a no-op.
    pub fn lock(&self) {
        *self.guard() = None;
    }

    /// Add or fully replace the record for `service`, then re-encrypt
    /// and persist the whole store. Fails closed while locked and for
    /// an empty service name.
    pub fn add_credential(&self, service: &str, username: &str, password: &str) -> bool {
        if service.is_empty() {
            return false;
        }

        let mut guard = self.guard();
        let Some(session) = guard.as_mut() else {
            return false;
        };

        session.store.upsert(service, username, password);
        Self::persist(&self.path, session).is_ok()
    }

    /// Look up the credential for `service`. None while locked.
    pub fn get_credential(&self, service: &str) -> Option<Credential> {
        self.guard().as_ref()?.get(service)
    }

    /// All service names in lexicographic order. Empty while locked.
    pub fn services(&self) -> Vec<String> {
        self.guard()
            .as_ref()
            .map(|s| s.store.services())
            .unwrap_or_default()
    }

    /// Number of stored credentials. Zero while locked.
    pub fn credential_count(&self) -> usize {
        self.guard().as_ref().map_or(0, |s| s.store.len())
    }

    /// Remove the record for `service`, then persist. False if locked
    /// or the service is absent.
    pub fn remove_credential(&self, service: &str) -> bool {
        let mut guard = self.guard();
        let Some(session) = guard.as_mut() else {
            return false;
        };

        if !session.store.remove(service) {
            return false;
        }
        Self::persist(&self.path, session).is_ok()
    }

    /// Re-encrypt the store under a fresh salt and nonce and rewrite
    /// the vault file. Fails closed while locked.
    pub fn save(&self) -> bool {
        match self.guard().as_ref() {
            Some(session) => Self::persist(&self.path, session).is_ok(),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Fallible internals
    // ------------------------------------------------------------------

    fn try_initialize(&self, password: &str) -> Result<Session> {
        if self.path.exists() {
            return Err(VaultError::VaultAlreadyExists(self.path.clone()));
        }

        let auth_token = crypto::encrypt(AUTH_CHECK_PLAINTEXT, password)?;
        let session = Session {
            master_password: Zeroizing::new(password.to_string()),
            auth_token,
            store: CredentialStore::new(),
        };

        Self::persist(&self.path, &session)?;
        Ok(session)
    }

    fn try_unlock(&self, password: &str) -> Result<Session> {
        let (auth_token, credentials) = file::read_vault(&self.path)?;

        // Cheap password check against the auth token before the full
        // credentials decrypt.
        if !crypto::verify_password(&auth_token, password) {
            return Err(VaultError::DecryptionFailed);
        }

        let plaintext = Zeroizing::new(crypto::decrypt(&credentials, password)?);
        let payload = std::str::from_utf8(&plaintext)
            .map_err(|_| VaultError::InvalidFormat("credential payload is not UTF-8".into()))?;

        let mut store = CredentialStore::new();
        store.decode(payload)?;

        Ok(Session {
            master_password: Zeroizing::new(password.to_string()),
            auth_token,
            store,
        })
    }

    /// Encode, encrypt, and atomically rewrite the vault file. The auth
    /// token is written back verbatim; only the credentials blob gets a
    /// fresh salt and nonce.
    fn persist(path: &Path, session: &Session) -> Result<()> {
        let payload = Zeroizing::new(session.store.encode()?);
        let credentials = crypto::encrypt(payload.as_bytes(), &session.master_password)?;
        file::write_vault(path, &session.auth_token, &credentials)
    }

    /// Lock the session mutex, recovering from poisoning: a panicked
    /// holder can only have left the session in a droppable state, and
    /// dropping it locks the vault, which is the safe direction.
    fn guard(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Session {
    fn get(&self, service: &str) -> Option<Credential> {
        self.store.get(service).cloned()
    }
}
