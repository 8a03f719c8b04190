//! Credential domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A language-model provider whose API credentials the vault stores.
///
/// The built-in variants cover the providers the application ships with;
/// `Custom` keeps the set extensible without a format change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Provider {
    OpenAI,
    Gemini,
    Custom(String),
}

impl Provider {
    /// Providers the application ships with.
    pub const BUILTIN: [Provider; 2] = [Provider::OpenAI, Provider::Gemini];

    /// Canonical string form, used as the JSON map key in the legacy
    /// format and as the CLI argument.
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenAI => "OpenAI",
            Provider::Gemini => "Gemini",
            Provider::Custom(name) => name,
        }
    }

    /// Name of the process-environment variable that overrides any stored
    /// entry for this provider.
    pub fn env_var(&self) -> String {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY".to_string(),
            Provider::Gemini => "GEMINI_API_KEY".to_string(),
            Provider::Custom(name) => {
                let mut var: String = name
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() {
                            c.to_ascii_uppercase()
                        } else {
                            '_'
                        }
                    })
                    .collect();
                var.push_str("_API_KEY");
                var
            }
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Provider {
    fn from(name: &str) -> Self {
        match name {
            "OpenAI" | "openai" => Provider::OpenAI,
            "Gemini" | "gemini" => Provider::Gemini,
            other => Provider::Custom(other.to_string()),
        }
    }
}

impl From<String> for Provider {
    fn from(name: String) -> Self {
        Provider::from(name.as_str())
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        provider.as_str().to_string()
    }
}

/// An opaque API secret.
///
/// Zeroized on drop; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display form that never reveals more than the last four characters,
    /// e.g. `...3fk9`.
    pub fn masked(&self) -> String {
        // Fourth character from the end; slicing by characters, not bytes,
        // so multibyte secrets cannot split a char boundary
        match self.0.char_indices().rev().nth(3) {
            Some((index, _)) if index > 0 => format!("...{}", &self.0[index..]),
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One named credential held by the vault.
///
/// `(provider, label)` is unique within a vault snapshot; labels let a user
/// hold multiple keys per provider (e.g. personal vs. work).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    pub provider: Provider,
    pub label: String,
    pub secret: Secret,
    pub created_at: DateTime<Utc>,
}

impl CredentialEntry {
    /// Create an entry stamped with the current time.
    pub fn new(provider: Provider, label: impl Into<String>, secret: Secret) -> Self {
        Self {
            provider,
            label: label.into(),
            secret,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for provider in [
            Provider::OpenAI,
            Provider::Gemini,
            Provider::Custom("Mistral".to_string()),
        ] {
            let name = provider.as_str().to_string();
            assert_eq!(Provider::from(name), provider);
        }
    }

    #[test]
    fn test_provider_env_var() {
        assert_eq!(Provider::OpenAI.env_var(), "OPENAI_API_KEY");
        assert_eq!(Provider::Gemini.env_var(), "GEMINI_API_KEY");
        assert_eq!(
            Provider::Custom("my-llm".to_string()).env_var(),
            "MY_LLM_API_KEY"
        );
    }

    #[test]
    fn test_provider_serde_as_string() {
        let json = serde_json::to_string(&Provider::OpenAI).unwrap();
        assert_eq!(json, "\"OpenAI\"");

        let parsed: Provider = serde_json::from_str("\"Gemini\"").unwrap();
        assert_eq!(parsed, Provider::Gemini);

        let custom: Provider = serde_json::from_str("\"Anthropic\"").unwrap();
        assert_eq!(custom, Provider::Custom("Anthropic".to_string()));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = Secret::new("sk-very-sensitive");
        assert_eq!(format!("{:?}", secret), "Secret([REDACTED])");
    }

    #[test]
    fn test_secret_masked() {
        assert_eq!(Secret::new("sk-abcd1234").masked(), "...1234");
        assert_eq!(Secret::new("ab").masked(), "***");
        assert_eq!(Secret::new("abcd").masked(), "***");
    }

    #[test]
    fn test_secret_masked_multibyte() {
        // Tail landing mid-codepoint must not panic
        assert_eq!(Secret::new("abcé€").masked(), "...bcé€");
        assert_eq!(Secret::new("abcé€xyz").masked(), "...€xyz");
        assert_eq!(Secret::new("é€").masked(), "***");
    }

    #[test]
    fn test_entry_serde_roundtrip() {
        let entry = CredentialEntry::new(Provider::OpenAI, "work", Secret::new("sk-A"));
        let json = serde_json::to_string(&entry).unwrap();
        let restored: CredentialEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, entry);
    }
}
