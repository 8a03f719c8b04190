//! The cipher envelope: authenticated encryption with XChaCha20-Poly1305.
//!
//! XChaCha20-Poly1305 provides both confidentiality and authenticity, with a
//! 24-byte nonce that is safe for random generation. A wrong master password
//! and on-disk corruption both surface deterministically as
//! `AuthenticationFailure`, never as silently-wrong plaintext.

use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305,
};

use crate::keys::SessionKey;
use coachdesk_common::{Error, Result};

/// Nonce size for XChaCha20-Poly1305 (24 bytes).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Encrypt a payload under the session key.
///
/// # Postconditions
/// - Returns nonce || ciphertext || tag
/// - The nonce is freshly random per call, so sealing the same payload
///   twice yields different outputs
///
/// # Errors
/// - `Crypto` if encryption fails
pub fn seal(key: &SessionKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    // Prepend nonce so open() is self-contained given only the key
    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypt a sealed payload.
///
/// # Preconditions
/// - `sealed` must be at least NONCE_SIZE + TAG_SIZE bytes
///
/// # Errors
/// - `AuthenticationFailure` on wrong key, tampering, or truncation;
///   the authentication tag is verified before any plaintext is returned
pub fn open(key: &SessionKey, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::AuthenticationFailure);
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
    let nonce = GenericArray::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes()));

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::AuthenticationFailure)
}
