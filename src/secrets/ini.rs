//! INI file secret backend.
//!
//! A flat key/value store in a local INI file, read fully into memory at
//! construction and rewritten in full on every write. Suitable for
//! development and testing; deployments with real secrets should prefer a
//! cloud backend.
//!
//! Flat keys resolve against the `Secrets` section; scoped keys address any
//! section of the file. Writes are not atomic across processes: two
//! writers interleaving read-modify-write cycles can lose updates (known
//! limitation).

use super::backend::{BackendKind, SecretBackend};
use super::error::{Result, SecretsError};
use super::types::SecretKey;
use async_trait::async_trait;
use ini::Ini;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Section used to resolve flat keys in file-backed stores.
pub(crate) const DEFAULT_SECTION: &str = "Secrets";

/// INI file secret backend.
pub struct IniSecretBackend {
    path: PathBuf,
    document: Ini,
}

impl fmt::Debug for IniSecretBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The document holds secret values; only the path is printable.
        f.debug_struct("IniSecretBackend").field("path", &self.path).finish()
    }
}

impl IniSecretBackend {
    /// Open an INI secrets file, reading it fully into memory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = Ini::load_from_file(&path).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to read INI secrets file {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), "Loaded INI secrets file");
        Ok(Self { path, document })
    }

    fn section_and_key(key: &SecretKey) -> (&str, &str) {
        match key {
            SecretKey::Flat(k) => (DEFAULT_SECTION, k.as_str()),
            SecretKey::Scoped { section, key } => (section.as_str(), key.as_str()),
        }
    }
}

#[async_trait]
impl SecretBackend for IniSecretBackend {
    async fn get(&self, key: &SecretKey) -> Result<String> {
        let (section, name) = Self::section_and_key(key);
        self.document
            .get_from(Some(section), name)
            .map(str::to_owned)
            .ok_or_else(|| SecretsError::not_found(key.to_string()))
    }

    async fn set(&mut self, key: &SecretKey, value: &str) -> Result<()> {
        let (section, name) = Self::section_and_key(key);
        self.document.with_section(Some(section)).set(name, value);

        // The in-memory document is the source of truth; persist it whole.
        self.document.write_to_file(&self.path).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to write INI secrets file {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), key = %key, "Stored secret in INI file");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Ini
    }

    async fn health_check(&self) -> Result<()> {
        std::fs::metadata(&self.path).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("INI secrets file {} is not accessible", self.path.display()),
                e,
            )
        })?;
        Ok(())
    }
}
