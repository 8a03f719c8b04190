//! Common types shared across the CoachDesk secrets subsystem.
//!
//! This crate provides the error taxonomy and the credential domain types
//! used by every other crate, ensuring consistency and type safety.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{CredentialEntry, Provider, Secret};
