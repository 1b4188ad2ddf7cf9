//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - The length-prefixed blob wire format (`codec`)
//! - The two-blob vault file layout with atomic writes (`file`)
//! - The `Credential` record and in-memory `CredentialStore` (`credential`, `store`)
//! - The `VaultController` lock/unlock state machine (`controller`)

pub mod codec;
pub mod controller;
pub mod credential;
pub mod file;
pub mod store;

// Re-export the most commonly used items.
pub use controller::VaultController;
pub use credential::Credential;
pub use store::CredentialStore;
