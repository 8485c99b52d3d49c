//! HashiCorp Vault secret backend.
//!
//! Resolves secrets from the KV v2 engine. A scoped key maps to a field of
//! the secret stored at the section path within the configured mount; a
//! flat key maps to the `value` field of the secret at that path:
//!
//! - `Scoped { section: "ssrs_credentials", key: "username" }` reads field
//!   `username` of the secret at `ssrs_credentials`
//! - `Flat("api_token")` reads field `value` of the secret at `api_token`
//!
//! KV v2 writes replace the whole data map of a path, so `set` performs a
//! read-modify-write of the secret's map before storing it back.

use super::backend::{BackendKind, SecretBackend};
use super::error::{Result, SecretsError};
use super::types::{SecretKey, SecretString};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

fn default_kv_mount() -> String {
    "secret".to_string()
}

/// Configuration for the Vault backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultBackendConfig {
    /// Vault server address
    pub address: String,
    /// Vault authentication token
    pub token: Option<SecretString>,
    /// Vault namespace (for Enterprise)
    pub namespace: Option<String>,
    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_kv_mount")]
    pub mount_path: String,
}

impl VaultBackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Uses:
    /// - `CREDBROKER_VAULT_ADDR` or `VAULT_ADDR`
    /// - `CREDBROKER_VAULT_TOKEN` or `VAULT_TOKEN`
    /// - `CREDBROKER_VAULT_NAMESPACE` or `VAULT_NAMESPACE`
    /// - `CREDBROKER_VAULT_MOUNT` (default: "secret")
    ///
    /// Returns `Ok(None)` when no address is set.
    pub fn from_env() -> Result<Option<Self>> {
        let address =
            std::env::var("CREDBROKER_VAULT_ADDR").or_else(|_| std::env::var("VAULT_ADDR")).ok();

        let Some(address) = address else {
            return Ok(None);
        };

        let token = std::env::var("CREDBROKER_VAULT_TOKEN")
            .or_else(|_| std::env::var("VAULT_TOKEN"))
            .ok()
            .map(SecretString::from);

        let namespace = std::env::var("CREDBROKER_VAULT_NAMESPACE")
            .or_else(|_| std::env::var("VAULT_NAMESPACE"))
            .ok();

        let mount_path =
            std::env::var("CREDBROKER_VAULT_MOUNT").unwrap_or_else(|_| default_kv_mount());

        Ok(Some(Self { address, token, namespace, mount_path }))
    }
}

/// HashiCorp Vault secret backend.
pub struct VaultSecretBackend {
    client: VaultClient,
    mount_path: String,
}

impl std::fmt::Debug for VaultSecretBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretBackend")
            .field("mount_path", &self.mount_path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultSecretBackend {
    /// Create a new Vault backend with the given configuration.
    ///
    /// No network round trip happens here; an unreachable server surfaces
    /// on the first `get`/`set`/`health_check`.
    pub fn new(config: VaultBackendConfig) -> Result<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token.expose_secret());
        }

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder
            .build()
            .map_err(|e| SecretsError::config(format!("Invalid Vault configuration: {}", e)))?;

        let client = VaultClient::new(settings)
            .map_err(|e| SecretsError::config(format!("Failed to create Vault client: {}", e)))?;

        info!(address = %config.address, mount_path = %config.mount_path, "Initialized Vault secret backend");

        Ok(Self { client, mount_path: config.mount_path })
    }

    /// Create a backend from environment configuration.
    pub fn from_env() -> Result<Option<Self>> {
        match VaultBackendConfig::from_env()? {
            Some(config) => Ok(Some(Self::new(config)?)),
            None => Ok(None),
        }
    }

    /// Map a key onto the KV v2 path to read and the field within it.
    fn locate(key: &SecretKey) -> (&str, &str) {
        match key {
            SecretKey::Flat(k) => (k.as_str(), "value"),
            SecretKey::Scoped { section, key } => (section.as_str(), key.as_str()),
        }
    }

    async fn read_map(&self, path: &str) -> std::result::Result<SecretData, ClientError> {
        kv2::read(&self.client, &self.mount_path, path).await
    }
}

type SecretData = HashMap<String, serde_json::Value>;

fn render_field(key: &SecretKey, value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SecretsError::config(format!("value at '{}' is not a scalar", key))),
    }
}

#[async_trait]
impl SecretBackend for VaultSecretBackend {
    async fn get(&self, key: &SecretKey) -> Result<String> {
        let (path, field) = Self::locate(key);

        debug!(path = %path, mount_path = %self.mount_path, "Fetching secret from Vault");

        let data = self.read_map(path).await.map_err(|e| match e {
            ClientError::APIError { code: 404, .. } => SecretsError::not_found(key.to_string()),
            other => SecretsError::unavailable_with_source(
                format!("failed to read secret at '{}' from Vault", path),
                other,
            ),
        })?;

        let value = data.get(field).ok_or_else(|| SecretsError::not_found(key.to_string()))?;
        render_field(key, value)
    }

    async fn set(&mut self, key: &SecretKey, value: &str) -> Result<()> {
        let (path, field) = Self::locate(key);

        // KV v2 replaces the full data map on write, so carry the
        // untouched fields forward. A missing path starts empty.
        let mut data = match self.read_map(path).await {
            Ok(data) => data,
            Err(ClientError::APIError { code: 404, .. }) => SecretData::new(),
            Err(other) => {
                return Err(SecretsError::unavailable_with_source(
                    format!("failed to read secret at '{}' from Vault before update", path),
                    other,
                ))
            }
        };
        data.insert(field.to_owned(), serde_json::Value::String(value.to_owned()));

        kv2::set(&self.client, &self.mount_path, path, &data).await.map_err(|e| {
            SecretsError::unavailable_with_source(
                format!("failed to write secret at '{}' to Vault", path),
                e,
            )
        })?;

        debug!(path = %path, key = %key, "Stored secret in Vault");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Vault
    }

    async fn health_check(&self) -> Result<()> {
        vaultrs::sys::health(&self.client).await.map_err(|e| {
            SecretsError::unavailable_with_source("Vault health check failed", e)
        })?;
        Ok(())
    }
}
