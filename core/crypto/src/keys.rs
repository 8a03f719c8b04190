//! Key and salt types with secure memory handling.
//!
//! The session key automatically zeroizes its memory on drop to prevent
//! sensitive data from persisting in memory.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the derived symmetric key in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of the key-derivation salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Symmetric key derived from the master password for one unlock session.
///
/// Held in memory only, never persisted or logged; zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    key: [u8; KEY_LENGTH],
}

impl SessionKey {
    /// Create a session key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey([REDACTED])")
    }
}

/// Salt for key derivation.
///
/// Generated fresh whenever encryption is enabled or the master password
/// changes; never reused across vaults. Serialized as base64 in the
/// container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a random salt from the OS entropy source.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut salt = [0u8; SALT_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        let bytes: [u8; SALT_LENGTH] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("salt must be 16 bytes"))?;
        Ok(Self(bytes))
    }
}
