//! CoachDesk secrets CLI - manage the local credential vault.
//!
//! This tool exposes the vault state machine on the command line:
//! inspecting status, storing and removing provider keys, and the
//! encryption lifecycle (protect, unprotect, change password).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use coachdesk_common::Provider;
use coachdesk_secrets::SecretsManager;

#[derive(Parser)]
#[command(name = "coachdesk-secrets")]
#[command(about = "CoachDesk - local API credential vault")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the vault file (defaults to the per-user config directory).
    #[arg(long)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show vault status: lock state, entry count, environment overrides.
    Status,

    /// List stored keys for a provider (masked, never full values).
    List {
        /// Provider name (OpenAI, Gemini, or a custom name).
        provider: String,
    },

    /// Store a new key under a label.
    Add {
        provider: String,

        /// Label for this key, unique per provider (e.g. "work").
        #[arg(short, long, default_value = "default")]
        label: String,
    },

    /// Remove a stored key.
    Remove {
        provider: String,

        #[arg(short, long, default_value = "default")]
        label: String,
    },

    /// Print the key the application would use for a provider.
    Resolve {
        provider: String,

        /// Label to select when several keys are stored.
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Enable encryption with a master password.
    Protect,

    /// Disable encryption, storing keys in the clear again.
    Unprotect,

    /// Change the master password.
    Passwd,
}

fn default_vault_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("could not determine the user config directory")?;
    Ok(base.join("coachdesk").join("secrets_store.json"))
}

/// Open the vault and, if it is locked, prompt for the master password.
fn open_unlocked(path: &std::path::Path) -> Result<SecretsManager> {
    let manager = SecretsManager::open(path)
        .with_context(|| format!("failed to open vault at {}", path.display()))?;

    if manager.status().locked {
        let password = rpassword::prompt_password("Master password: ")?;
        manager.unlock(&password).context("unlock failed")?;
    }

    Ok(manager)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = match cli.vault {
        Some(path) => path,
        None => default_vault_path()?,
    };

    match cli.command {
        Commands::Status => {
            let manager = SecretsManager::open(&path)?;
            let status = manager.status();

            println!("Vault:      {}", path.display());
            println!("Encrypted:  {}", status.encrypted);
            println!("Locked:     {}", status.locked);
            println!("Entries:    {}", status.entry_count);
            if status.env_overrides.is_empty() {
                println!("Overrides:  none");
            } else {
                let names: Vec<&str> = status.env_overrides.iter().map(|p| p.as_str()).collect();
                println!("Overrides:  {}", names.join(", "));
            }
        }

        Commands::List { provider } => {
            let provider = Provider::from(provider.as_str());
            let manager = open_unlocked(&path)?;

            let entries = manager.list_entries(&provider)?;
            if entries.is_empty() {
                println!("No keys stored for {}", provider);
            }
            for entry in entries {
                println!(
                    "{}  {}  {}  added {}",
                    entry.provider,
                    entry.label,
                    entry.secret.masked(),
                    entry.created_at.format("%Y-%m-%d")
                );
            }
        }

        Commands::Add { provider, label } => {
            let provider = Provider::from(provider.as_str());
            let manager = open_unlocked(&path)?;

            let secret = rpassword::prompt_password(format!("{} API key: ", provider))?;
            manager.add_entry(provider.clone(), &label, secret.as_str().into())?;
            println!("Stored {} key '{}'", provider, label);
        }

        Commands::Remove { provider, label } => {
            let provider = Provider::from(provider.as_str());
            let manager = open_unlocked(&path)?;

            manager.remove_entry(&provider, &label)?;
            println!("Removed {} key '{}'", provider, label);
        }

        Commands::Resolve { provider, label } => {
            let provider = Provider::from(provider.as_str());
            let manager = SecretsManager::open(&path)
                .with_context(|| format!("failed to open vault at {}", path.display()))?;

            // Environment overrides resolve without the vault, so only
            // prompt for the password when a stored entry is needed
            let secret = match manager.resolve(&provider, label.as_deref()) {
                Err(coachdesk_common::Error::Locked) => {
                    let password = rpassword::prompt_password("Master password: ")?;
                    manager.unlock(&password).context("unlock failed")?;
                    manager.resolve(&provider, label.as_deref())?
                }
                other => other?,
            };
            println!("{}", secret.expose());
        }

        Commands::Protect => {
            let manager = open_unlocked(&path)?;

            let password = rpassword::prompt_password("New master password: ")?;
            let confirm = rpassword::prompt_password("Confirm master password: ")?;
            if password != confirm {
                bail!("passwords do not match");
            }

            manager.enable_encryption(&password)?;
            println!("Vault is now encrypted");
        }

        Commands::Unprotect => {
            let manager = open_unlocked(&path)?;
            manager.disable_encryption()?;
            println!("Vault keys are now stored in the clear");
        }

        Commands::Passwd => {
            let manager = open_unlocked(&path)?;

            let password = rpassword::prompt_password("New master password: ")?;
            let confirm = rpassword::prompt_password("Confirm master password: ")?;
            if password != confirm {
                bail!("passwords do not match");
            }

            manager.change_password(&password)?;
            println!("Master password changed");
        }
    }

    Ok(())
}
