//! Secret backend trait and kinds.
//!
//! Defines the core interface for pluggable secret backends.

use super::error::{Result, SecretsError};
use super::types::SecretKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of secret backend.
///
/// This is the closed set of discriminator values a configuration source
/// may select from. Anything else fails backend resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// HashiCorp Vault KV v2
    Vault,
    /// GCP Secret Manager
    Gcp,
    /// Local INI file
    Ini,
    /// Local YAML file
    Yaml,
}

impl BackendKind {
    /// All members of the closed set, in display order.
    pub const ALL: [BackendKind; 4] = [Self::Vault, Self::Gcp, Self::Ini, Self::Yaml];

    /// Get the configuration representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::Gcp => "gcp",
            Self::Ini => "ini",
            Self::Yaml => "yaml",
        }
    }

    /// Comma-separated list of valid discriminator values, used in
    /// `UnsupportedBackend` messages.
    pub fn supported() -> String {
        Self::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for BackendKind {
    type Err = SecretsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "vault" => Ok(Self::Vault),
            "gcp" | "gcp_secret_manager" => Ok(Self::Gcp),
            "ini" => Ok(Self::Ini),
            "yaml" => Ok(Self::Yaml),
            _ => Err(SecretsError::unsupported_backend(s, Self::supported())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for secret backends.
///
/// Implementations must be Send + Sync for use in async contexts. An
/// instance owns exclusive access to its medium and is intended to be held
/// by a single logical task; mutation goes through `&mut self` and there is
/// no internal locking. Sharing across tasks requires an external wrapper
/// supplied by the caller.
#[async_trait]
pub trait SecretBackend: Send + Sync + fmt::Debug {
    /// Look up the value stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`] when the key is absent (no default
    ///   substitution, no partial match)
    /// - [`SecretsError::Unavailable`] when the medium cannot be reached
    ///   or refuses the operation (distinct from NotFound)
    async fn get(&self, key: &SecretKey) -> Result<String>;

    /// Write or overwrite the value stored under `key`.
    ///
    /// A `get` for the same key on the same instance immediately after a
    /// successful `set` observes the new value. File-backed implementations
    /// rewrite their entire medium on every call.
    async fn set(&mut self, key: &SecretKey, value: &str) -> Result<()>;

    /// The backend kind identifier.
    fn kind(&self) -> BackendKind;

    /// Cheap reachability probe against the backend medium.
    async fn health_check(&self) -> Result<()>;
}
