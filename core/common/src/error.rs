//! Common error types for the secrets subsystem.

use thiserror::Error;

/// Top-level error type for vault operations.
///
/// Every failure surfaces to the immediate caller as one of these variants;
/// nothing is swallowed, retried, or downgraded to an insecure fallback.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied master password does not open the vault.
    ///
    /// Recoverable: the caller re-prompts. The vault stays locked and no
    /// entry is partially exposed.
    #[error("Wrong master password")]
    WrongPassword,

    /// More than one entry exists for the provider and no label was given.
    ///
    /// Recoverable: the caller must disambiguate with an explicit label.
    #[error("Multiple keys stored for {provider}; specify one of: {labels:?}")]
    AmbiguousSelection {
        provider: String,
        labels: Vec<String>,
    },

    /// Ciphertext failed authentication: tampered, truncated, or sealed
    /// under a different key. The vault is unusable until the user repairs
    /// or resets it explicitly.
    #[error("Vault ciphertext failed authentication")]
    AuthenticationFailure,

    /// The operation requires an unlocked vault.
    #[error("Vault is locked")]
    Locked,

    /// Filesystem-level failure, surfaced verbatim and never retried.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided (empty password, duplicate label, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cryptographic operation failed for a reason other than
    /// authentication (bad parameters, unusable key material).
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Vault state-machine violation (e.g. enabling encryption twice).
    #[error("Vault error: {0}")]
    Vault(String),
}

impl Error {
    /// Whether the caller can recover by re-prompting the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::WrongPassword | Error::AmbiguousSelection { .. } | Error::InvalidInput(_)
        )
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
