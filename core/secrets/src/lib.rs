//! Credential vault for CoachDesk.
//!
//! This crate provides:
//! - The versioned on-disk container format, plaintext or encrypted
//! - Atomic, crash-safe persistence with restrictive file permissions
//! - One-shot migration of the legacy unversioned format
//! - The `SecretsManager` lock/unlock state machine with deterministic
//!   merging of process-environment overrides
//!
//! # Architecture
//! `SecretsManager` is the only entry point used by collaborators; it
//! delegates persistence to `store`, encryption to `coachdesk-crypto`, and
//! format upgrades to `migration` on first load.

pub mod container;
pub mod manager;
pub mod migration;
pub mod store;

pub use container::{LoadedContainer, VaultContainer, CONTAINER_VERSION};
pub use manager::{SecretsManager, VaultStatus};
pub use migration::migrate_legacy;
