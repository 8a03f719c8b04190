//! On-disk vault container format.
//!
//! The container is a versioned JSON document holding either an encrypted
//! payload plus the metadata needed to re-derive its key, or the plaintext
//! entry list. The legacy pre-vault shape (a flat provider-to-secret object
//! with no `version` field) is represented separately so the dynamic shape
//! is resolved exactly once, at load time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use coachdesk_common::{CredentialEntry, Error, Result};
use coachdesk_crypto::Salt;

/// Current container format version. Migrations only ever increase this.
pub const CONTAINER_VERSION: u32 = 1;

/// Versioned vault container as persisted on disk.
///
/// Exactly one of `ciphertext` / `plaintext_entries` is populated,
/// determined by `locked`. A locked container must also carry the salt and
/// iteration count used to derive its key; neither is ever reused across
/// vaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultContainer {
    pub version: u32,
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Salt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf_iterations: Option<u32>,
    #[serde(default, with = "base64_opt", skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_entries: Option<Vec<CredentialEntry>>,
}

impl VaultContainer {
    /// Build an unlocked container holding entries in the clear.
    pub fn plaintext(entries: Vec<CredentialEntry>) -> Self {
        Self {
            version: CONTAINER_VERSION,
            locked: false,
            salt: None,
            kdf_iterations: None,
            ciphertext: None,
            plaintext_entries: Some(entries),
        }
    }

    /// Build a locked container around a sealed payload.
    pub fn encrypted(salt: Salt, kdf_iterations: u32, ciphertext: Vec<u8>) -> Self {
        Self {
            version: CONTAINER_VERSION,
            locked: true,
            salt: Some(salt),
            kdf_iterations: Some(kdf_iterations),
            ciphertext: Some(ciphertext),
            plaintext_entries: None,
        }
    }

    /// Check the container invariants.
    ///
    /// # Errors
    /// - `Serialization` if the shape is inconsistent with `locked` or the
    ///   version predates the current format (version 0 files must go
    ///   through migration, never through this type)
    pub fn validate(&self) -> Result<()> {
        if self.version < CONTAINER_VERSION {
            return Err(Error::Serialization(format!(
                "Unsupported container version {}",
                self.version
            )));
        }
        if self.locked {
            if self.salt.is_none() || self.kdf_iterations.is_none() || self.ciphertext.is_none() {
                return Err(Error::Serialization(
                    "Locked container is missing salt, kdf_iterations, or ciphertext".to_string(),
                ));
            }
            if self.plaintext_entries.is_some() {
                return Err(Error::Serialization(
                    "Locked container must not hold plaintext entries".to_string(),
                ));
            }
        } else {
            if self.plaintext_entries.is_none() {
                return Err(Error::Serialization(
                    "Unlocked container is missing plaintext entries".to_string(),
                ));
            }
            if self.ciphertext.is_some() {
                return Err(Error::Serialization(
                    "Unlocked container must not hold ciphertext".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Serialize an entry list into the payload that gets sealed.
    pub fn encode_entries(entries: &[CredentialEntry]) -> Result<Vec<u8>> {
        serde_json::to_vec(entries).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a decrypted payload back into the entry list.
    pub fn decode_entries(payload: &[u8]) -> Result<Vec<CredentialEntry>> {
        serde_json::from_slice(payload).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Result of parsing a vault file: the single dispatch point between the
/// legacy unversioned shape and the current container.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedContainer {
    /// Flat `provider -> secret` object predating the vault format
    /// (implicit version 0). Read-only target for migration.
    Legacy(BTreeMap<String, String>),
    /// Current versioned container.
    Current(VaultContainer),
}

/// Serde helper: `Option<Vec<u8>>` as a base64 string.
mod base64_opt {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        encoded
            .map(|s| BASE64.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
