//! One-shot migration of the legacy unversioned secrets file.
//!
//! The legacy shape is a flat `provider -> secret` JSON object (implicit
//! version 0). Migration rewrites it into the current plaintext container;
//! the manager persists the result immediately, so the legacy shape is
//! never read twice.

use std::collections::BTreeMap;

use crate::container::VaultContainer;
use coachdesk_common::{CredentialEntry, Provider, Secret};

/// Label assigned to entries recovered from the legacy format, which had
/// no notion of multiple keys per provider.
pub const LEGACY_LABEL: &str = "default";

/// Rewrite a legacy mapping into a current plaintext container.
///
/// Each `provider -> secret` pair becomes one entry labeled
/// [`LEGACY_LABEL`]. No entry is dropped. Idempotence is by construction:
/// the caller only invokes this for `LoadedContainer::Legacy`, and the
/// persisted result is versioned and never matches the legacy shape again.
pub fn migrate_legacy(legacy: BTreeMap<String, String>) -> VaultContainer {
    let entries = legacy
        .into_iter()
        .map(|(provider, secret)| {
            CredentialEntry::new(Provider::from(provider), LEGACY_LABEL, Secret::new(secret))
        })
        .collect();

    VaultContainer::plaintext(entries)
}
