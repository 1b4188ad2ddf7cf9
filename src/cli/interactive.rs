//! The interactive shell and the idle-timeout auto-lock worker.
//!
//! The worker thread is the single external concurrent actor in the
//! system: it shares the controller through an `Arc` and calls `lock()`
//! on its own schedule, relying on the controller's internal mutex to
//! never interleave with a half-finished command on this thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use dialoguer::{Confirm, Input, Password};

use crate::cli::{output, prompt_new_password, prompt_password, Cli};
use crate::errors::{Result, VaultError};
use crate::password;
use crate::security;
use crate::vault::VaultController;

/// How often the auto-lock worker wakes up to check for idleness.
const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shared last-activity timestamp, bumped on every command.
type ActivityClock = Arc<Mutex<Instant>>;

/// Run the interactive shell until the user exits or authentication
/// fails. Locks the vault on the way out.
pub fn run(cli: &Cli) -> Result<()> {
    let vault = Arc::new(VaultController::new(&cli.vault_file));
    let last_activity: ActivityClock = Arc::new(Mutex::new(Instant::now()));
    let running = Arc::new(AtomicBool::new(true));

    if !authenticate(&vault)? {
        return Ok(());
    }

    let worker = spawn_auto_lock_worker(
        Arc::clone(&vault),
        Arc::clone(&last_activity),
        Arc::clone(&running),
        Duration::from_secs(cli.auto_lock_secs),
    );

    print_commands(cli.auto_lock_secs);

    loop {
        if vault.is_locked() {
            output::warning("Vault is locked. Please authenticate.");
            if !authenticate(&vault)? {
                break;
            }
            touch(&last_activity);
        }

        let command: String = Input::new()
            .with_prompt("passvault")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| VaultError::CommandFailed(format!("command prompt: {e}")))?;
        touch(&last_activity);

        let result = match command.trim() {
            "" => continue,
            "add" => handle_add(&vault),
            "get" => handle_get(&vault),
            "list" => handle_list(&vault),
            "remove" => handle_remove(&vault),
            "generate" => handle_generate(),
            "status" => handle_status(&vault, &last_activity, cli.auto_lock_secs),
            "help" => {
                print_commands(cli.auto_lock_secs);
                Ok(())
            }
            "exit" | "quit" => break,
            other => {
                output::warning(&format!(
                    "Unknown command `{other}`. Type `help` for the list."
                ));
                Ok(())
            }
        };

        if let Err(e) = result {
            output::error(&e.to_string());
        }
    }

    running.store(false, Ordering::SeqCst);
    vault.lock();
    output::info("Vault locked. Goodbye!");

    // The worker wakes every poll interval and sees `running` cleared;
    // process exit does not wait for it.
    drop(worker);
    Ok(())
}

fn print_commands(auto_lock_secs: u64) {
    println!("Available commands:");
    println!("  add      - Store a credential for a service");
    println!("  get      - Retrieve a credential");
    println!("  list     - List all stored services");
    println!("  remove   - Remove a credential");
    println!("  generate - Generate a random password");
    println!("  status   - Show vault status");
    println!("  help     - Show this help message");
    println!("  exit     - Lock the vault and quit");
    output::tip(&format!(
        "The vault auto-locks after {auto_lock_secs} seconds of inactivity."
    ));
}

/// Unlock an existing vault or create a new one. Returns false when the
/// user runs out of attempts or creation fails.
fn authenticate(vault: &Arc<VaultController>) -> Result<bool> {
    if vault.vault_exists() {
        for _ in 0..3 {
            let password = prompt_password()?;
            if vault.unlock(&password) {
                output::success("Vault unlocked.");
                return Ok(true);
            }
            output::error("Incorrect password.");
        }
        output::error("Too many failed attempts.");
        Ok(false)
    } else {
        output::info("No vault found. Creating a new one.");
        let password = prompt_new_password()?;
        if vault.initialize_vault(&password) {
            output::success(&format!("Vault created at {}.", vault.path().display()));
            Ok(true)
        } else {
            output::error("Failed to create vault.");
            Ok(false)
        }
    }
}

fn spawn_auto_lock_worker(
    vault: Arc<VaultController>,
    last_activity: ActivityClock,
    running: Arc<AtomicBool>,
    idle_limit: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::SeqCst) {
            thread::sleep(POLL_INTERVAL);

            let idle = last_activity
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .elapsed();

            if idle >= idle_limit && !vault.is_locked() {
                vault.lock();
                output::warning("Auto-locked the vault after inactivity.");
            }
        }
    })
}

fn touch(last_activity: &ActivityClock) {
    *last_activity.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn handle_add(vault: &VaultController) -> Result<()> {
    let service = prompt_trimmed("Service name")?;
    if service.is_empty() {
        output::error("Service name cannot be empty.");
        return Ok(());
    }

    if vault.get_credential(&service).is_some() {
        let update = Confirm::new()
            .with_prompt(format!("Service '{service}' already exists. Update?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;
        if !update {
            return Ok(());
        }
    }

    let username: String = Input::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;

    let mut password = Password::new()
        .with_prompt("Password (leave empty to generate)")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

    if password.is_empty() {
        let (length, include_symbols) = prompt_generator_options()?;
        password = password::generate(length, include_symbols);
        output::info(&format!("Generated password: {password}"));
    }

    if vault.add_credential(&service, &username, &password) {
        output::success(&format!("Credential for '{service}' saved."));
    } else {
        output::error("Failed to save credential — the vault may have locked.");
    }

    security::erase_string(&mut password);
    Ok(())
}

fn handle_get(vault: &VaultController) -> Result<()> {
    let service = prompt_trimmed("Service name")?;

    match vault.get_credential(&service) {
        Some(cred) => {
            println!("Service:  {}", cred.service);
            println!("Username: {}", cred.username);
            println!("Password: {}", cred.password);
        }
        None => output::error(&format!("Service '{service}' not found.")),
    }
    Ok(())
}

fn handle_list(vault: &VaultController) -> Result<()> {
    let rows: Vec<(String, String)> = vault
        .services()
        .into_iter()
        .filter_map(|service| {
            let username = vault.get_credential(&service)?.username.clone();
            Some((service, username))
        })
        .collect();

    output::print_services_table(&rows);
    Ok(())
}

fn handle_remove(vault: &VaultController) -> Result<()> {
    let service = prompt_trimmed("Service name to remove")?;

    if vault.get_credential(&service).is_none() {
        output::error(&format!("Service '{service}' not found."));
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Remove '{service}'?"))
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

    if confirmed {
        if vault.remove_credential(&service) {
            output::success(&format!("Removed '{service}'."));
        } else {
            output::error("Failed to remove credential — the vault may have locked.");
        }
    }
    Ok(())
}

fn handle_generate() -> Result<()> {
    let (length, include_symbols) = prompt_generator_options()?;

    let mut generated = password::generate(length, include_symbols);
    let (_, message) = password::validate_strength(&generated);

    println!("Generated password: {generated}");
    output::info(&format!("Strength: {message}"));

    security::erase_string(&mut generated);
    Ok(())
}

fn handle_status(
    vault: &VaultController,
    last_activity: &ActivityClock,
    auto_lock_secs: u64,
) -> Result<()> {
    println!("Vault file:  {}", vault.path().display());
    println!(
        "File exists: {}",
        if vault.vault_exists() { "yes" } else { "no" }
    );
    println!(
        "Status:      {}",
        if vault.is_locked() { "locked" } else { "unlocked" }
    );
    println!("Credentials: {}", vault.credential_count());

    if !vault.is_locked() {
        let idle = last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed();
        let remaining = auto_lock_secs.saturating_sub(idle.as_secs());
        println!("Auto-lock in {remaining} seconds");
    }
    Ok(())
}

fn prompt_trimmed(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(value.trim().to_string())
}

fn prompt_generator_options() -> Result<(usize, bool)> {
    let length: usize = Input::new()
        .with_prompt("Password length")
        .default(16)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;

    let include_symbols = Confirm::new()
        .with_prompt("Include symbols?")
        .default(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

    Ok((length, include_symbols))
}
