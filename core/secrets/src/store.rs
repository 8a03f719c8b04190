//! Atomic vault persistence.
//!
//! The container is written to a temporary file in the destination
//! directory and renamed over the target, so a crash mid-write leaves
//! either the old or the new container intact, never a partial one.
//! Filesystem errors surface verbatim; nothing is retried.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::container::{LoadedContainer, VaultContainer};
use coachdesk_common::{Error, Result};

/// Read and parse the vault file.
///
/// Returns `None` if the file does not exist. A file without a `version`
/// field is returned as `LoadedContainer::Legacy` for the caller to
/// migrate; this function never upgrades silently.
///
/// # Errors
/// - `Io` on filesystem failure other than absence
/// - `Serialization` if the file is not a recognizable container shape
pub fn load(path: &Path) -> Result<Option<LoadedContainer>> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let value: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|e| Error::Serialization(e.to_string()))?;

    // Single dispatch point between the legacy and versioned shapes
    let loaded = if value.get("version").is_some() {
        let container: VaultContainer =
            serde_json::from_value(value).map_err(|e| Error::Serialization(e.to_string()))?;
        container.validate()?;
        LoadedContainer::Current(container)
    } else {
        let legacy: BTreeMap<String, String> = serde_json::from_value(value)
            .map_err(|e| Error::Serialization(format!("Unrecognized vault shape: {}", e)))?;
        LoadedContainer::Legacy(legacy)
    };

    debug!(path = %path.display(), "loaded vault container");
    Ok(Some(loaded))
}

/// Atomically persist the container.
///
/// Writes to a temporary file in the same directory, restricts permissions
/// to owner read/write, syncs, then renames over the destination.
///
/// # Errors
/// - `Io` on any filesystem failure, surfaced without retry
pub fn save(path: &Path, container: &VaultContainer) -> Result<()> {
    container.validate()?;

    let json = serde_json::to_vec_pretty(container).map_err(|e| Error::Serialization(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    debug!(path = %path.display(), locked = container.locked, "saved vault container");
    Ok(())
}
