//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is stored in the vault container alongside the salt,
//! so the work factor can be raised over time without invalidating vaults
//! written under the old cost.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::keys::{Salt, SessionKey, KEY_LENGTH};
use coachdesk_common::{Error, Result};

/// Default PBKDF2 iteration count for newly encrypted vaults.
///
/// Sized so that a single derivation is noticeable but tolerable
/// interactively, and offline guessing is expensive.
pub const DEFAULT_ITERATIONS: u32 = 480_000;

/// Derive a session key from a password and salt.
///
/// Deterministic: the same `(password, salt, iterations)` always yields the
/// same key.
///
/// # Errors
/// - `InvalidInput` if the password is empty or `iterations` is zero
///
/// # Security
/// - The password is not stored or logged
/// - The derived key zeroizes on drop
pub fn derive_key(password: &str, salt: &Salt, iterations: u32) -> Result<SessionKey> {
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }
    if iterations == 0 {
        return Err(Error::InvalidInput(
            "KDF iteration count must be positive".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        iterations,
        &mut key_bytes,
    );

    Ok(SessionKey::from_bytes(key_bytes))
}
