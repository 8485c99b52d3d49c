//! YAML file secret backend.
//!
//! A nested section → key → value store in a local YAML file. The whole
//! file is parsed into memory at construction and dumped back in full on
//! every write, with the same non-atomicity caveat as the INI backend.
//!
//! Scalar values (strings, numbers, booleans) are returned in their string
//! rendering; a key holding a nested mapping or sequence is a
//! configuration error, not a secret.

use super::backend::{BackendKind, SecretBackend};
use super::error::{Result, SecretsError};
use super::ini::DEFAULT_SECTION;
use super::types::SecretKey;
use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

type Document = BTreeMap<String, BTreeMap<String, Value>>;

/// YAML file secret backend.
pub struct YamlSecretBackend {
    path: PathBuf,
    document: Document,
}

impl fmt::Debug for YamlSecretBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlSecretBackend").field("path", &self.path).finish()
    }
}

impl YamlSecretBackend {
    /// Open a YAML secrets file, parsing it fully into memory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to read YAML secrets file {}", path.display()),
                e,
            )
        })?;

        // An empty file is an empty store, not a parse error.
        let document = if raw.trim().is_empty() {
            Document::new()
        } else {
            serde_yaml::from_str(&raw).map_err(|e| {
                SecretsError::unavailable_with_source(
                    format!("malformed YAML secrets file {}", path.display()),
                    e,
                )
            })?
        };

        debug!(path = %path.display(), sections = document.len(), "Loaded YAML secrets file");
        Ok(Self { path, document })
    }

    fn section_and_key(key: &SecretKey) -> (&str, &str) {
        match key {
            SecretKey::Flat(k) => (DEFAULT_SECTION, k.as_str()),
            SecretKey::Scoped { section, key } => (section.as_str(), key.as_str()),
        }
    }

    fn render_scalar(key: &SecretKey, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(SecretsError::config(format!("value at '{}' is not a scalar", key))),
        }
    }
}

#[async_trait]
impl SecretBackend for YamlSecretBackend {
    async fn get(&self, key: &SecretKey) -> Result<String> {
        let (section, name) = Self::section_and_key(key);
        let value = self
            .document
            .get(section)
            .and_then(|entries| entries.get(name))
            .ok_or_else(|| SecretsError::not_found(key.to_string()))?;

        Self::render_scalar(key, value)
    }

    async fn set(&mut self, key: &SecretKey, value: &str) -> Result<()> {
        let (section, name) = Self::section_and_key(key);
        self.document
            .entry(section.to_owned())
            .or_default()
            .insert(name.to_owned(), Value::String(value.to_owned()));

        let rendered = serde_yaml::to_string(&self.document).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to serialize YAML secrets file {}", self.path.display()),
                e,
            )
        })?;
        std::fs::write(&self.path, rendered).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to write YAML secrets file {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), key = %key, "Stored secret in YAML file");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Yaml
    }

    async fn health_check(&self) -> Result<()> {
        std::fs::metadata(&self.path).map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("YAML secrets file {} is not accessible", self.path.display()),
                e,
            )
        })?;
        Ok(())
    }
}
