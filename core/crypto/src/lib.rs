//! Cryptographic primitives for the CoachDesk secrets vault.
//!
//! This crate provides:
//! - Password-based key derivation (PBKDF2-HMAC-SHA256)
//! - Authenticated encryption (XChaCha20-Poly1305)
//! - Key and salt types with secure memory handling
//!
//! # Architecture
//! Both operations are pure transforms over the derived session key; all
//! persistence and state live in the secrets crate.

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{open, seal, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, DEFAULT_ITERATIONS};
pub use keys::{Salt, SessionKey, KEY_LENGTH, SALT_LENGTH};
