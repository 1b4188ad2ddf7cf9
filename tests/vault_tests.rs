//! Integration tests for the passvault vault module: file layout,
//! controller state machine, and persistence.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use passvault::crypto::encrypt;
use passvault::vault::{file, VaultController};
use tempfile::TempDir;

/// Helper: a vault file path inside a fresh temp dir.
fn vault_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("test.vault");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[test]
fn initialize_creates_file_and_unlocks() {
    let (_dir, path) = vault_path();
    let vault = VaultController::new(&path);

    assert!(!vault.vault_exists());
    assert!(vault.is_locked());

    assert!(vault.initialize_vault("CorrectHorse1!"));

    assert!(vault.vault_exists());
    assert!(!vault.is_locked());
    assert_eq!(vault.credential_count(), 0);
}

#[test]
fn initialize_refuses_existing_file() {
    let (_dir, path) = vault_path();

    let first = VaultController::new(&path);
    assert!(first.initialize_vault("password-one"));

    // A second controller must not clobber the existing vault.
    let second = VaultController::new(&path);
    assert!(!second.initialize_vault("password-two"));
    assert!(second.is_locked());

    // The original vault still opens with the original password.
    assert!(second.unlock("password-one"));
}

// ---------------------------------------------------------------------------
// Unlock / lock state machine
// ---------------------------------------------------------------------------

#[test]
fn unlock_with_wrong_password_stays_locked() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("right-password"));
    vault.lock();

    assert!(!vault.unlock("wrong-password"));
    assert!(vault.is_locked());
    assert!(vault.services().is_empty());

    assert!(vault.unlock("right-password"));
    assert!(!vault.is_locked());
}

#[test]
fn lock_is_idempotent_and_clears_state() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "p@ss"));

    vault.lock();
    vault.lock(); // locking an already-locked vault is a no-op

    assert!(vault.is_locked());
    assert!(vault.services().is_empty());
    assert_eq!(vault.credential_count(), 0);
    assert!(vault.get_credential("email").is_none());
}

#[test]
fn locked_operations_fail_closed_and_leave_disk_untouched() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "p@ss"));
    vault.lock();

    let before = fs::read(&path).expect("read vault file");

    assert!(!vault.add_credential("bank", "bob", "pw"));
    assert!(!vault.remove_credential("email"));
    assert!(!vault.save());
    assert!(vault.get_credential("email").is_none());
    assert!(vault.services().is_empty());
    assert_eq!(vault.credential_count(), 0);

    let after = fs::read(&path).expect("read vault file");
    assert_eq!(before, after, "locked operations must not alter the file");
}

// ---------------------------------------------------------------------------
// Credential operations and persistence
// ---------------------------------------------------------------------------

#[test]
fn mutations_persist_immediately() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "p@ss"));
    // No explicit save: every mutation rewrites the file.

    let reopened = VaultController::new(&path);
    assert!(reopened.unlock("CorrectHorse1!"));
    let cred = reopened.get_credential("email").expect("credential");
    assert_eq!(cred.username, "alice");
    assert_eq!(cred.password, "p@ss");
}

#[test]
fn add_replaces_existing_service() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "old"));
    assert!(vault.add_credential("email", "alice@new", "new"));

    assert_eq!(vault.credential_count(), 1);
    let cred = vault.get_credential("email").expect("credential");
    assert_eq!(cred.username, "alice@new");
    assert_eq!(cred.password, "new");
}

#[test]
fn add_rejects_empty_service_name() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(!vault.add_credential("", "alice", "pw"));
    assert_eq!(vault.credential_count(), 0);
}

#[test]
fn remove_persists_and_reports_absence() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "pw"));
    assert!(vault.add_credential("bank", "bob", "pw2"));

    assert!(vault.remove_credential("email"));
    assert!(!vault.remove_credential("email"));

    let reopened = VaultController::new(&path);
    assert!(reopened.unlock("CorrectHorse1!"));
    assert_eq!(reopened.services(), vec!["bank"]);
}

#[test]
fn services_are_lexicographic_regardless_of_insertion_order() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("zebra", "z", "1"));
    assert!(vault.add_credential("alpha", "a", "2"));
    assert!(vault.add_credential("middle", "m", "3"));

    assert_eq!(vault.services(), vec!["alpha", "middle", "zebra"]);
}

#[test]
fn hostile_credential_values_survive_persistence() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("tricky", "SERVICE:fake", "line1\n---\nline2"));

    let reopened = VaultController::new(&path);
    assert!(reopened.unlock("CorrectHorse1!"));
    let cred = reopened.get_credential("tricky").expect("credential");
    assert_eq!(cred.username, "SERVICE:fake");
    assert_eq!(cred.password, "line1\n---\nline2");
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_lifecycle() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "p@ss"));
    vault.lock();

    // Wrong password: still locked, nothing readable.
    assert!(!vault.unlock("wrong"));
    assert!(vault.is_locked());
    assert!(vault.services().is_empty());

    // Correct password: everything comes back.
    assert!(vault.unlock("CorrectHorse1!"));
    let cred = vault.get_credential("email").expect("credential");
    assert_eq!(
        (cred.service.as_str(), cred.username.as_str(), cred.password.as_str()),
        ("email", "alice", "p@ss")
    );
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[test]
fn file_roundtrips_two_blobs() {
    let (_dir, path) = vault_path();

    let auth = encrypt(b"VAULT_AUTH_CHECK", "pw").expect("encrypt auth");
    let creds = encrypt(b"[]", "pw").expect("encrypt creds");

    file::write_vault(&path, &auth, &creds).expect("write vault");
    let (read_auth, read_creds) = file::read_vault(&path).expect("read vault");

    assert_eq!(read_auth, auth);
    assert_eq!(read_creds, creds);
}

#[test]
fn auth_token_is_stable_across_saves() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    let (auth_before, _) = file::read_vault(&path).expect("read vault");

    assert!(vault.add_credential("email", "alice", "p@ss"));
    assert!(vault.add_credential("bank", "bob", "pw"));

    // The auth token is created once and rewritten verbatim.
    let (auth_after, _) = file::read_vault(&path).expect("read vault");
    assert_eq!(auth_before, auth_after);
}

#[test]
fn credentials_blob_gets_fresh_salt_each_save() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    let (_, creds_before) = file::read_vault(&path).expect("read vault");

    assert!(vault.save());
    let (_, creds_after) = file::read_vault(&path).expect("read vault");

    assert_ne!(creds_before.salt, creds_after.salt);
    assert_ne!(creds_before.nonce, creds_after.nonce);
}

#[test]
fn corrupted_magic_is_rejected() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    vault.lock();

    let mut data = fs::read(&path).expect("read vault file");
    data[0] ^= 0xFF;
    fs::write(&path, &data).expect("write corrupted file");

    assert!(!vault.unlock("CorrectHorse1!"));
    assert!(vault.is_locked());
}

#[test]
fn truncated_file_is_rejected() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    vault.lock();

    let data = fs::read(&path).expect("read vault file");
    fs::write(&path, &data[..data.len() / 2]).expect("write truncated file");

    assert!(!vault.unlock("CorrectHorse1!"));
}

#[test]
fn tampered_credentials_blob_is_rejected() {
    let (_dir, path) = vault_path();

    let vault = VaultController::new(&path);
    assert!(vault.initialize_vault("CorrectHorse1!"));
    assert!(vault.add_credential("email", "alice", "p@ss"));
    vault.lock();

    // Flip a byte near the end of the file (inside the credentials
    // ciphertext) — the auth tag must catch it.
    let mut data = fs::read(&path).expect("read vault file");
    let last = data.len() - 1;
    data[last] ^= 0xFF;
    fs::write(&path, &data).expect("write tampered file");

    assert!(!vault.unlock("CorrectHorse1!"));
    assert!(vault.is_locked());
}

// ---------------------------------------------------------------------------
// Concurrent lock vs. in-flight mutation
// ---------------------------------------------------------------------------

#[test]
fn concurrent_lock_never_corrupts_the_vault() {
    let (_dir, path) = vault_path();

    let vault = Arc::new(VaultController::new(&path));
    assert!(vault.initialize_vault("CorrectHorse1!"));

    // A second thread playing the idle-timeout role, locking repeatedly
    // while the foreground thread adds credentials.
    let locker = {
        let vault = Arc::clone(&vault);
        thread::spawn(move || {
            for _ in 0..20 {
                vault.lock();
                thread::yield_now();
            }
        })
    };

    let mut accepted = Vec::new();
    for i in 0..20 {
        let service = format!("service-{i:02}");
        if !vault.unlock("CorrectHorse1!") {
            continue;
        }
        if vault.add_credential(&service, "user", "pw") {
            accepted.push(service);
        }
    }

    locker.join().expect("locker thread");

    // Whatever happened, the file must still parse and unlock, and every
    // accepted add must have been persisted atomically.
    let reopened = VaultController::new(&path);
    assert!(reopened.unlock("CorrectHorse1!"));
    let services = reopened.services();
    for service in &accepted {
        assert!(services.contains(service), "{service} was acked but lost");
    }
}
