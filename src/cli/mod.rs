//! CLI module — Clap argument parser, output helpers, and the
//! interactive shell.

pub mod interactive;
pub mod output;

use clap::Parser;

use crate::errors::{Result, VaultError};
use crate::security::Zeroizing;

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// passvault: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    /// Path to the vault file
    #[arg(long, default_value = "vault.dat", env = "PASSVAULT_FILE")]
    pub vault_file: String,

    /// Idle seconds before the vault locks itself
    #[arg(long, default_value_t = 120)]
    pub auto_lock_secs: u64,
}

// ---------------------------------------------------------------------------
// Shared prompt helpers
// ---------------------------------------------------------------------------

/// Prompt for the master password of an existing vault.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on
/// drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation, showing strength
/// feedback and asking before accepting a weak one.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on
/// drop.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Create master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        let (score, message) = crate::password::validate_strength(&password);
        output::info(&format!("Password strength: {message}"));

        if score < 40 {
            let proceed = dialoguer::Confirm::new()
                .with_prompt("Weak password detected. Continue anyway?")
                .default(false)
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;
            if !proceed {
                continue;
            }
        }

        return Ok(Zeroizing::new(password));
    }
}
