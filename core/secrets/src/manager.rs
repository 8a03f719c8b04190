//! The consumer-facing vault state machine.
//!
//! A `SecretsManager` owns one vault file and the in-memory state derived
//! from it. All operations are synchronous and serialized behind a single
//! mutex; callers needing responsiveness run them off the interactive
//! thread. Mutations are write-through: the container is persisted before
//! the in-memory state is updated, so a failed save never leaves the two
//! out of step.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::container::{LoadedContainer, VaultContainer};
use crate::migration;
use crate::store;
use coachdesk_common::{CredentialEntry, Error, Provider, Result, Secret};
use coachdesk_crypto::{aead, derive_key, Salt, SessionKey, DEFAULT_ITERATIONS};

/// Cached key material for an unlocked encrypted vault.
///
/// Lives in memory for the session only; the key zeroizes on drop.
struct CryptoContext {
    key: SessionKey,
    salt: Salt,
    iterations: u32,
}

enum VaultState {
    /// Encrypted vault, password not yet supplied. Entries inaccessible.
    Locked {
        salt: Salt,
        iterations: u32,
        ciphertext: Vec<u8>,
    },
    /// Entries accessible; `crypto` is `Some` iff encryption is enabled.
    Unlocked {
        entries: Vec<CredentialEntry>,
        crypto: Option<CryptoContext>,
    },
}

/// Read-only vault summary for display. Never exposes secret values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    /// Entries are currently inaccessible pending `unlock`.
    pub locked: bool,
    /// Encryption is enabled for this vault.
    pub encrypted: bool,
    /// Number of accessible entries (zero while locked).
    pub entry_count: usize,
    /// Providers whose environment variable is set and will shadow any
    /// stored entry.
    pub env_overrides: BTreeSet<Provider>,
}

/// Owner of one vault file and its lock/unlock lifecycle.
///
/// Collaborators receive a shared reference; overlapping operations are
/// serialized internally. Dropping the manager zeroizes any cached session
/// key.
pub struct SecretsManager {
    path: PathBuf,
    /// KDF cost applied when encryption is (re-)enabled. Existing vaults
    /// keep the cost recorded in their container until re-keyed.
    kdf_iterations: u32,
    state: Mutex<VaultState>,
}

impl SecretsManager {
    /// Open the vault at `path`, migrating a legacy file first.
    ///
    /// A missing file yields an empty plaintext vault, persisted on first
    /// mutation. A legacy (unversioned) file is rewritten to the current
    /// format immediately, so it is never parsed twice.
    ///
    /// # Errors
    /// - `Io` / `Serialization` if the file exists but cannot be read or
    ///   is not a recognizable container
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_iterations(path, DEFAULT_ITERATIONS)
    }

    /// Open with an explicit KDF cost for newly enabled encryption.
    ///
    /// The cost is persisted in the container, so it can be raised here
    /// over time without invalidating vaults written under the old cost.
    pub fn open_with_iterations(path: impl Into<PathBuf>, kdf_iterations: u32) -> Result<Self> {
        let path = path.into();

        let state = match store::load(&path)? {
            None => {
                debug!(path = %path.display(), "no vault file, starting empty");
                VaultState::Unlocked {
                    entries: Vec::new(),
                    crypto: None,
                }
            }
            Some(LoadedContainer::Legacy(map)) => {
                info!(path = %path.display(), entries = map.len(), "migrating legacy secrets file");
                let container = migration::migrate_legacy(map);
                store::save(&path, &container)?;
                VaultState::Unlocked {
                    entries: container.plaintext_entries.unwrap_or_default(),
                    crypto: None,
                }
            }
            Some(LoadedContainer::Current(container)) => Self::state_from(container)?,
        };

        Ok(Self {
            path,
            kdf_iterations,
            state: Mutex::new(state),
        })
    }

    fn state_from(container: VaultContainer) -> Result<VaultState> {
        if container.locked {
            match (container.salt, container.kdf_iterations, container.ciphertext) {
                (Some(salt), Some(iterations), Some(ciphertext)) => Ok(VaultState::Locked {
                    salt,
                    iterations,
                    ciphertext,
                }),
                _ => Err(Error::Serialization(
                    "Locked container is missing key-derivation metadata".to_string(),
                )),
            }
        } else {
            Ok(VaultState::Unlocked {
                entries: container.plaintext_entries.unwrap_or_default(),
                crypto: None,
            })
        }
    }

    /// Path of the vault file this manager owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_state(&self) -> MutexGuard<'_, VaultState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unlock an encrypted vault with the master password.
    ///
    /// On a wrong password the state is unchanged and entries are never
    /// partially exposed. On success the derived key is cached in memory
    /// for the rest of the session, never persisted.
    ///
    /// # Errors
    /// - `WrongPassword` if the payload fails authentication
    /// - `Vault` if the vault is not locked
    pub fn unlock(&self, password: &str) -> Result<()> {
        let mut state = self.lock_state();

        let unlocked = match &*state {
            VaultState::Locked {
                salt,
                iterations,
                ciphertext,
            } => {
                let key = derive_key(password, salt, *iterations)?;
                let payload = aead::open(&key, ciphertext).map_err(|e| match e {
                    Error::AuthenticationFailure => Error::WrongPassword,
                    other => other,
                })?;
                let entries = VaultContainer::decode_entries(&payload)?;

                VaultState::Unlocked {
                    entries,
                    crypto: Some(CryptoContext {
                        key,
                        salt: salt.clone(),
                        iterations: *iterations,
                    }),
                }
            }
            VaultState::Unlocked { .. } => {
                return Err(Error::Vault("Vault is not locked".to_string()))
            }
        };

        *state = unlocked;
        info!("vault unlocked");
        Ok(())
    }

    /// Turn encryption on for a plaintext vault.
    ///
    /// Generates a fresh salt, seals the current entries, and persists the
    /// locked container. The session stays unlocked with the derived key
    /// cached.
    ///
    /// # Errors
    /// - `InvalidInput` if the password is empty
    /// - `Locked` if the vault is locked
    /// - `Vault` if encryption is already enabled
    pub fn enable_encryption(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::InvalidInput("Password cannot be empty".to_string()));
        }

        let mut state = self.lock_state();
        match &mut *state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { crypto: Some(_), .. } => {
                Err(Error::Vault("Encryption is already enabled".to_string()))
            }
            VaultState::Unlocked { entries, crypto } => {
                let salt = Salt::generate();
                let key = derive_key(password, &salt, self.kdf_iterations)?;
                let ctx = CryptoContext {
                    key,
                    salt,
                    iterations: self.kdf_iterations,
                };

                store::save(&self.path, &Self::sealed_container(entries, &ctx)?)?;
                *crypto = Some(ctx);
                info!("vault encryption enabled");
                Ok(())
            }
        }
    }

    /// Turn encryption off, persisting entries in the clear.
    ///
    /// # Errors
    /// - `Locked` if the vault is locked
    /// - `Vault` if encryption is not enabled
    pub fn disable_encryption(&self) -> Result<()> {
        let mut state = self.lock_state();
        match &mut *state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { crypto: None, .. } => {
                Err(Error::Vault("Encryption is not enabled".to_string()))
            }
            VaultState::Unlocked { entries, crypto } => {
                store::save(&self.path, &VaultContainer::plaintext(entries.clone()))?;
                *crypto = None;
                info!("vault encryption disabled");
                Ok(())
            }
        }
    }

    /// Re-key the vault under a new master password.
    ///
    /// Uses a fresh salt; the old salt and key are discarded.
    ///
    /// # Errors
    /// - `InvalidInput` if the new password is empty
    /// - `Locked` if the vault is locked
    /// - `Vault` if encryption is not enabled
    pub fn change_password(&self, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(Error::InvalidInput("Password cannot be empty".to_string()));
        }

        let mut state = self.lock_state();
        match &mut *state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { crypto: None, .. } => {
                Err(Error::Vault("Encryption is not enabled".to_string()))
            }
            VaultState::Unlocked { entries, crypto } => {
                let salt = Salt::generate();
                let key = derive_key(new_password, &salt, self.kdf_iterations)?;
                let ctx = CryptoContext {
                    key,
                    salt,
                    iterations: self.kdf_iterations,
                };

                store::save(&self.path, &Self::sealed_container(entries, &ctx)?)?;
                *crypto = Some(ctx);
                info!("vault master password changed");
                Ok(())
            }
        }
    }

    /// Store a new credential and persist immediately.
    ///
    /// # Errors
    /// - `InvalidInput` on an empty label or secret, or a duplicate
    ///   `(provider, label)` pair
    /// - `Locked` if the vault is locked
    pub fn add_entry(&self, provider: Provider, label: &str, secret: Secret) -> Result<()> {
        if label.is_empty() {
            return Err(Error::InvalidInput("Label cannot be empty".to_string()));
        }
        if secret.is_empty() {
            return Err(Error::InvalidInput("Secret cannot be empty".to_string()));
        }

        let mut state = self.lock_state();
        match &mut *state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { entries, crypto } => {
                if entries
                    .iter()
                    .any(|e| e.provider == provider && e.label == label)
                {
                    return Err(Error::InvalidInput(format!(
                        "A {} key labeled '{}' already exists",
                        provider, label
                    )));
                }

                let mut updated = entries.clone();
                updated.push(CredentialEntry::new(provider, label, secret));

                store::save(&self.path, &Self::container_for(&updated, crypto.as_ref())?)?;
                *entries = updated;
                Ok(())
            }
        }
    }

    /// Remove a credential and persist immediately.
    ///
    /// # Errors
    /// - `NotFound` if no such `(provider, label)` entry exists
    /// - `Locked` if the vault is locked
    pub fn remove_entry(&self, provider: &Provider, label: &str) -> Result<()> {
        let mut state = self.lock_state();
        match &mut *state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { entries, crypto } => {
                let index = entries
                    .iter()
                    .position(|e| &e.provider == provider && e.label == label)
                    .ok_or_else(|| {
                        Error::NotFound(format!("No {} key labeled '{}'", provider, label))
                    })?;

                let mut updated = entries.clone();
                updated.remove(index);

                store::save(&self.path, &Self::container_for(&updated, crypto.as_ref())?)?;
                *entries = updated;
                Ok(())
            }
        }
    }

    /// List the entries stored for one provider.
    ///
    /// # Errors
    /// - `Locked` if the vault is locked
    pub fn list_entries(&self, provider: &Provider) -> Result<Vec<CredentialEntry>> {
        let state = self.lock_state();
        match &*state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { entries, .. } => Ok(entries
                .iter()
                .filter(|e| &e.provider == provider)
                .cloned()
                .collect()),
        }
    }

    /// List every stored entry.
    ///
    /// # Errors
    /// - `Locked` if the vault is locked
    pub fn entries(&self) -> Result<Vec<CredentialEntry>> {
        let state = self.lock_state();
        match &*state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { entries, .. } => Ok(entries.clone()),
        }
    }

    /// Resolve the secret to use for a provider.
    ///
    /// Merge policy: the provider's environment variable, read on every
    /// call, always takes precedence over stored entries, even while the
    /// vault is locked. Without an override, a single stored entry wins;
    /// several entries require an explicit label.
    ///
    /// # Errors
    /// - `Locked` if no override is set and the vault is locked
    /// - `NotFound` if no entry matches
    /// - `AmbiguousSelection` if several entries exist and no label was
    ///   given
    pub fn resolve(&self, provider: &Provider, label: Option<&str>) -> Result<Secret> {
        if let Ok(value) = std::env::var(provider.env_var()) {
            if !value.is_empty() {
                debug!(provider = %provider, "using environment override");
                return Ok(Secret::new(value));
            }
        }

        let state = self.lock_state();
        match &*state {
            VaultState::Locked { .. } => Err(Error::Locked),
            VaultState::Unlocked { entries, .. } => {
                let matches: Vec<&CredentialEntry> =
                    entries.iter().filter(|e| &e.provider == provider).collect();

                match label {
                    Some(label) => matches
                        .iter()
                        .find(|e| e.label == label)
                        .map(|e| e.secret.clone())
                        .ok_or_else(|| {
                            Error::NotFound(format!("No {} key labeled '{}'", provider, label))
                        }),
                    None => match matches.as_slice() {
                        [] => Err(Error::NotFound(format!("No key stored for {}", provider))),
                        [single] => Ok(single.secret.clone()),
                        several => Err(Error::AmbiguousSelection {
                            provider: provider.to_string(),
                            labels: several.iter().map(|e| e.label.clone()).collect(),
                        }),
                    },
                }
            }
        }
    }

    /// Read-only summary for display. Never exposes secret values.
    pub fn status(&self) -> VaultStatus {
        let state = self.lock_state();

        let (locked, encrypted, entry_count, stored): (bool, bool, usize, BTreeSet<Provider>) =
            match &*state {
                VaultState::Locked { .. } => (true, true, 0, BTreeSet::new()),
                VaultState::Unlocked { entries, crypto } => (
                    false,
                    crypto.is_some(),
                    entries.len(),
                    entries.iter().map(|e| e.provider.clone()).collect(),
                ),
            };

        let env_overrides = Provider::BUILTIN
            .iter()
            .cloned()
            .chain(stored)
            .filter(|p| std::env::var(p.env_var()).map(|v| !v.is_empty()).unwrap_or(false))
            .collect();

        VaultStatus {
            locked,
            encrypted,
            entry_count,
            env_overrides,
        }
    }

    fn sealed_container(entries: &[CredentialEntry], ctx: &CryptoContext) -> Result<VaultContainer> {
        let payload = VaultContainer::encode_entries(entries)?;
        let ciphertext = aead::seal(&ctx.key, &payload)?;
        Ok(VaultContainer::encrypted(
            ctx.salt.clone(),
            ctx.iterations,
            ciphertext,
        ))
    }

    fn container_for(
        entries: &[CredentialEntry],
        crypto: Option<&CryptoContext>,
    ) -> Result<VaultContainer> {
        match crypto {
            Some(ctx) => Self::sealed_container(entries, ctx),
            None => Ok(VaultContainer::plaintext(entries.to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Cheap KDF cost keeps the tests fast; the state machine under test
    // is independent of the work factor.
    const TEST_ITERATIONS: u32 = 1_000;

    fn vault_path(dir: &TempDir) -> PathBuf {
        dir.path().join("secrets_store.json")
    }

    fn open(path: impl Into<PathBuf>) -> SecretsManager {
        SecretsManager::open_with_iterations(path, TEST_ITERATIONS).unwrap()
    }

    fn add(manager: &SecretsManager, provider: Provider, label: &str, secret: &str) {
        manager
            .add_entry(provider, label, Secret::new(secret))
            .unwrap();
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        let status = manager.status();
        assert!(!status.locked);
        assert!(!status.encrypted);
        assert_eq!(status.entry_count, 0);
    }

    #[test]
    fn test_add_list_remove() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        add(&manager, Provider::OpenAI, "work", "sk-A");
        add(&manager, Provider::OpenAI, "home", "sk-B");
        add(&manager, Provider::Gemini, "default", "key-1");

        let openai = manager.list_entries(&Provider::OpenAI).unwrap();
        assert_eq!(openai.len(), 2);

        manager.remove_entry(&Provider::OpenAI, "home").unwrap();
        assert_eq!(manager.list_entries(&Provider::OpenAI).unwrap().len(), 1);
        assert_eq!(manager.status().entry_count, 2);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        add(&manager, Provider::OpenAI, "work", "sk-A");
        let result = manager.add_entry(Provider::OpenAI, "work", Secret::new("sk-B"));
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Same label under another provider is fine
        add(&manager, Provider::Gemini, "work", "key-1");
    }

    #[test]
    fn test_remove_missing_entry() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        let result = manager.remove_entry(&Provider::OpenAI, "nope");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_mutations_are_write_through() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        add(&manager, Provider::OpenAI, "work", "sk-A");
        drop(manager);

        let reopened = open(&path);
        let secret = reopened.resolve(&Provider::OpenAI, None).unwrap();
        assert_eq!(secret.expose(), "sk-A");
    }

    #[test]
    fn test_resolve_ambiguous_without_label() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        add(&manager, Provider::OpenAI, "work", "sk-A");
        add(&manager, Provider::OpenAI, "home", "sk-B");

        let result = manager.resolve(&Provider::OpenAI, None);
        assert!(matches!(result, Err(Error::AmbiguousSelection { .. })));

        let secret = manager.resolve(&Provider::OpenAI, Some("work")).unwrap();
        assert_eq!(secret.expose(), "sk-A");
    }

    #[test]
    fn test_resolve_env_override_wins() {
        let provider = Provider::Custom("resolve-override-test".to_string());
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        add(&manager, provider.clone(), "default", "key-1");

        std::env::set_var(provider.env_var(), "key-2");
        let secret = manager.resolve(&provider, None).unwrap();
        std::env::remove_var(provider.env_var());

        assert_eq!(secret.expose(), "key-2");
    }

    #[test]
    fn test_resolve_env_override_while_locked() {
        let provider = Provider::Custom("locked-override-test".to_string());
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        add(&manager, provider.clone(), "default", "key-1");
        manager.enable_encryption("hunter2").unwrap();
        drop(manager);

        let locked = open(&path);
        assert!(locked.status().locked);

        // Without the override the vault must be unlocked first
        assert!(matches!(locked.resolve(&provider, None), Err(Error::Locked)));

        std::env::set_var(provider.env_var(), "key-2");
        let secret = locked.resolve(&provider, None).unwrap();
        std::env::remove_var(provider.env_var());

        assert_eq!(secret.expose(), "key-2");
    }

    #[test]
    fn test_enable_unlock_cycle_preserves_entries() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        add(&manager, Provider::OpenAI, "work", "sk-A");
        add(&manager, Provider::Gemini, "default", "key-1");
        let before = manager.entries().unwrap();

        manager.enable_encryption("hunter2").unwrap();
        // Session stays unlocked with the cached key
        assert_eq!(manager.entries().unwrap(), before);
        drop(manager);

        let reopened = open(&path);
        assert!(reopened.status().locked);
        assert!(matches!(reopened.entries(), Err(Error::Locked)));

        assert!(matches!(
            reopened.unlock("wrong-password"),
            Err(Error::WrongPassword)
        ));
        assert!(reopened.status().locked);

        reopened.unlock("hunter2").unwrap();
        assert_eq!(reopened.entries().unwrap(), before);
    }

    #[test]
    fn test_enable_then_disable_roundtrip() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        add(&manager, Provider::OpenAI, "work", "sk-A");
        let before = manager.entries().unwrap();

        manager.enable_encryption("hunter2").unwrap();
        manager.disable_encryption().unwrap();

        assert_eq!(manager.entries().unwrap(), before);
        assert!(!manager.status().encrypted);
    }

    #[test]
    fn test_enable_empty_password_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        assert!(matches!(
            manager.enable_encryption(""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_enable_twice_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = open(vault_path(&dir));

        manager.enable_encryption("hunter2").unwrap();
        assert!(matches!(
            manager.enable_encryption("other"),
            Err(Error::Vault(_))
        ));
    }

    #[test]
    fn test_change_password_rekeys_with_fresh_salt() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        add(&manager, Provider::OpenAI, "work", "sk-A");
        manager.enable_encryption("old-password").unwrap();

        let salt_before = match store::load(&path).unwrap() {
            Some(LoadedContainer::Current(c)) => c.salt.unwrap(),
            other => panic!("unexpected load result: {:?}", other),
        };

        manager.change_password("new-password").unwrap();

        let salt_after = match store::load(&path).unwrap() {
            Some(LoadedContainer::Current(c)) => c.salt.unwrap(),
            other => panic!("unexpected load result: {:?}", other),
        };
        assert_ne!(salt_before, salt_after);
        drop(manager);

        let reopened = open(&path);
        assert!(matches!(
            reopened.unlock("old-password"),
            Err(Error::WrongPassword)
        ));
        reopened.unlock("new-password").unwrap();
        assert_eq!(
            reopened
                .resolve(&Provider::OpenAI, Some("work"))
                .unwrap()
                .expose(),
            "sk-A"
        );
    }

    #[test]
    fn test_locked_vault_rejects_mutations() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        manager.enable_encryption("hunter2").unwrap();
        drop(manager);

        let locked = open(&path);
        assert!(matches!(
            locked.add_entry(Provider::OpenAI, "work", Secret::new("sk-A")),
            Err(Error::Locked)
        ));
        assert!(matches!(
            locked.remove_entry(&Provider::OpenAI, "work"),
            Err(Error::Locked)
        ));
        assert!(matches!(locked.disable_encryption(), Err(Error::Locked)));
    }

    #[test]
    fn test_open_migrates_legacy_file_once() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);
        std::fs::write(&path, r#"{"OpenAI": "sk-old", "Gemini": "key-old"}"#).unwrap();

        let manager = open(&path);
        assert_eq!(
            manager
                .resolve(&Provider::OpenAI, Some(migration::LEGACY_LABEL))
                .unwrap()
                .expose(),
            "sk-old"
        );

        // The upgraded container was persisted immediately
        match store::load(&path).unwrap() {
            Some(LoadedContainer::Current(c)) => {
                assert!(!c.locked);
                assert_eq!(c.plaintext_entries.unwrap().len(), 2);
            }
            other => panic!("legacy shape persisted after migration: {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_ciphertext_is_not_wrong_password() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let manager = open(&path);
        add(&manager, Provider::OpenAI, "work", "sk-A");
        manager.enable_encryption("hunter2").unwrap();
        drop(manager);

        // Flip a ciphertext byte on disk
        let mut container = match store::load(&path).unwrap() {
            Some(LoadedContainer::Current(c)) => c,
            other => panic!("unexpected load result: {:?}", other),
        };
        let ciphertext = container.ciphertext.as_mut().unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        store::save(&path, &container).unwrap();

        let reopened = open(&path);
        // Indistinguishable from a wrong password by design; the vault
        // stays locked and is never auto-reset
        assert!(matches!(
            reopened.unlock("hunter2"),
            Err(Error::WrongPassword)
        ));
        assert!(reopened.status().locked);
        assert!(path.exists());
    }
}
