//! GCP Secret Manager backend.
//!
//! Only compiled with the `gcp` feature. A flat key maps to a secret whose
//! payload is the raw value; a scoped key maps to a secret named after the
//! section whose payload is a JSON object holding the fields:
//!
//! - `Flat("api_token")` reads the latest version of secret
//!   `{prefix}api_token` as a raw string
//! - `Scoped { section: "ssrs_credentials", key: "username" }` reads the
//!   `username` field of the JSON payload of secret
//!   `{prefix}ssrs_credentials`
//!
//! `set` adds a new version to the secret; the secret resource itself must
//! already exist (this backend never creates or deletes secret containers).
//!
//! ## Configuration
//!
//! Environment variables:
//! - `CREDBROKER_GCP_PROJECT_ID` or `GCP_PROJECT_ID` - Required
//! - `CREDBROKER_GCP_SECRET_PREFIX` - Optional prefix for secret names
//! - `GOOGLE_APPLICATION_CREDENTIALS` - Path to a service account key

use super::error::Result;
use serde::{Deserialize, Serialize};

#[cfg(feature = "gcp")]
use super::backend::{BackendKind, SecretBackend};
#[cfg(feature = "gcp")]
use super::error::SecretsError;
#[cfg(feature = "gcp")]
use super::types::SecretKey;
#[cfg(feature = "gcp")]
use async_trait::async_trait;
#[cfg(feature = "gcp")]
use std::collections::HashMap;
#[cfg(feature = "gcp")]
use tracing::{debug, info};

#[cfg(feature = "gcp")]
use google_secretmanager1::{
    api::{AddSecretVersionRequest, SecretPayload},
    hyper_rustls, hyper_util, SecretManager,
};

fn default_secret_prefix() -> String {
    String::new()
}

/// Configuration for the GCP Secret Manager backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpBackendConfig {
    /// GCP project ID
    pub project_id: String,

    /// Optional prefix applied to secret names
    #[serde(default = "default_secret_prefix")]
    pub secret_prefix: String,
}

impl GcpBackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` if GCP is not configured (no project ID).
    pub fn from_env() -> Result<Option<Self>> {
        let project_id = std::env::var("CREDBROKER_GCP_PROJECT_ID")
            .or_else(|_| std::env::var("GCP_PROJECT_ID"))
            .ok();

        let Some(project_id) = project_id else {
            return Ok(None);
        };

        let secret_prefix = std::env::var("CREDBROKER_GCP_SECRET_PREFIX")
            .unwrap_or_else(|_| default_secret_prefix());

        Ok(Some(Self { project_id, secret_prefix }))
    }
}

/// GCP Secret Manager backend.
///
/// Authenticates with a service account key named by
/// `GOOGLE_APPLICATION_CREDENTIALS`.
#[cfg(feature = "gcp")]
pub struct GcpSecretBackend {
    hub: SecretManager<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    >,
    project_id: String,
    secret_prefix: String,
}

#[cfg(feature = "gcp")]
impl std::fmt::Debug for GcpSecretBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpSecretBackend")
            .field("project_id", &self.project_id)
            .field("secret_prefix", &self.secret_prefix)
            .field("hub", &"[SecretManager]")
            .finish()
    }
}

#[cfg(feature = "gcp")]
impl GcpSecretBackend {
    /// Create a new GCP Secret Manager backend with the given configuration.
    pub async fn new(config: GcpBackendConfig) -> Result<Self> {
        let client =
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(
                    hyper_rustls::HttpsConnectorBuilder::new()
                        .with_native_roots()
                        .map_err(|e| {
                            SecretsError::config(format!("Failed to load native TLS roots: {}", e))
                        })?
                        .https_or_http()
                        .enable_http2()
                        .build(),
                );

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(
            yup_oauth2::read_service_account_key(
                std::env::var("GOOGLE_APPLICATION_CREDENTIALS").unwrap_or_else(|_| String::new()),
            )
            .await
            .map_err(|e| {
                SecretsError::config(format!(
                    "Failed to read GCP credentials. Set GOOGLE_APPLICATION_CREDENTIALS to a \
                    service account key path: {}",
                    e
                ))
            })?,
        )
        .build()
        .await
        .map_err(|e| {
            SecretsError::unavailable(format!("Failed to build GCP authenticator: {}", e))
        })?;

        let hub = SecretManager::new(client, auth);

        info!(
            project_id = %config.project_id,
            secret_prefix = %config.secret_prefix,
            "Initialized GCP Secret Manager backend"
        );

        Ok(Self { hub, project_id: config.project_id, secret_prefix: config.secret_prefix })
    }

    /// Create a backend from environment configuration.
    pub async fn from_env() -> Result<Option<Self>> {
        match GcpBackendConfig::from_env()? {
            Some(config) => Ok(Some(Self::new(config).await?)),
            None => Ok(None),
        }
    }

    /// Map a key onto the secret name to address and the JSON payload
    /// field within it (`None` for raw payloads).
    fn locate(key: &SecretKey) -> (&str, Option<&str>) {
        match key {
            SecretKey::Flat(k) => (k.as_str(), None),
            SecretKey::Scoped { section, key } => (section.as_str(), Some(key.as_str())),
        }
    }

    /// Full resource name of a secret.
    fn secret_name(&self, name: &str) -> String {
        format!("projects/{}/secrets/{}{}", self.project_id, self.secret_prefix, name)
    }

    /// Full resource name of a secret's latest version.
    fn version_name(&self, name: &str) -> String {
        format!("{}/versions/latest", self.secret_name(name))
    }

    /// Fetch the latest payload of a secret as raw bytes.
    async fn access_payload(&self, key: &SecretKey, name: &str) -> Result<Vec<u8>> {
        let version = self.version_name(name);

        debug!(resource = %version, "Fetching secret from GCP Secret Manager");

        let (_, response) =
            self.hub.projects().secrets_versions_access(&version).doit().await.map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("NOT_FOUND") || err_str.contains("404") {
                    SecretsError::not_found(key.to_string())
                } else if err_str.contains("PERMISSION_DENIED") || err_str.contains("403") {
                    SecretsError::unavailable(format!(
                        "permission denied accessing secret '{}': {}",
                        name, err_str
                    ))
                } else {
                    SecretsError::unavailable(format!(
                        "failed to fetch secret '{}' from GCP: {}",
                        name, err_str
                    ))
                }
            })?;

        response
            .payload
            .and_then(|payload| payload.data)
            .filter(|data| !data.is_empty())
            .ok_or_else(|| {
                SecretsError::unavailable(format!("secret '{}' has an empty payload", name))
            })
    }

    /// Store `data` as a new version of the secret.
    async fn add_version(&self, name: &str, data: Vec<u8>) -> Result<()> {
        let request = AddSecretVersionRequest {
            payload: Some(SecretPayload { data: Some(data), ..Default::default() }),
        };

        self.hub
            .projects()
            .secrets_add_version(request, &self.secret_name(name))
            .doit()
            .await
            .map_err(|e| {
                SecretsError::unavailable(format!(
                    "failed to add version to secret '{}' in GCP: {}",
                    name, e
                ))
            })?;

        Ok(())
    }
}

#[cfg(feature = "gcp")]
#[async_trait]
impl SecretBackend for GcpSecretBackend {
    async fn get(&self, key: &SecretKey) -> Result<String> {
        let (name, field) = Self::locate(key);
        let data = self.access_payload(key, name).await?;

        let text = String::from_utf8(data).map_err(|e| {
            SecretsError::config(format!("secret '{}' payload is not valid UTF-8: {}", name, e))
        })?;

        match field {
            None => Ok(text),
            Some(field) => {
                let payload: HashMap<String, serde_json::Value> = serde_json::from_str(&text)
                    .map_err(|e| {
                        SecretsError::config(format!(
                            "secret '{}' payload is not a JSON object: {}",
                            name, e
                        ))
                    })?;
                let value = payload
                    .get(field)
                    .ok_or_else(|| SecretsError::not_found(key.to_string()))?;
                match value {
                    serde_json::Value::String(s) => Ok(s.clone()),
                    serde_json::Value::Number(n) => Ok(n.to_string()),
                    serde_json::Value::Bool(b) => Ok(b.to_string()),
                    _ => Err(SecretsError::config(format!("value at '{}' is not a scalar", key))),
                }
            }
        }
    }

    async fn set(&mut self, key: &SecretKey, value: &str) -> Result<()> {
        let (name, field) = Self::locate(key);

        let data = match field {
            None => value.as_bytes().to_vec(),
            Some(field) => {
                // Read-modify-write the JSON payload so sibling fields
                // survive the new version.
                let mut payload: HashMap<String, serde_json::Value> =
                    match self.access_payload(key, name).await {
                        Ok(data) => serde_json::from_slice(&data).map_err(|e| {
                            SecretsError::config(format!(
                                "secret '{}' payload is not a JSON object: {}",
                                name, e
                            ))
                        })?,
                        Err(SecretsError::NotFound { .. }) => HashMap::new(),
                        Err(other) => return Err(other),
                    };
                payload.insert(field.to_owned(), serde_json::Value::String(value.to_owned()));
                serde_json::to_vec(&payload).map_err(|e| {
                    SecretsError::config(format!(
                        "failed to serialize payload for secret '{}': {}",
                        name, e
                    ))
                })?
            }
        };

        self.add_version(name, data).await?;
        debug!(key = %key, "Stored secret in GCP Secret Manager");
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Gcp
    }

    async fn health_check(&self) -> Result<()> {
        let parent = format!("projects/{}", self.project_id);

        self.hub.projects().secrets_list(&parent).page_size(1).doit().await.map_err(|e| {
            SecretsError::unavailable(format!("GCP Secret Manager health check failed: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_prefix_is_empty() {
        assert_eq!(default_secret_prefix(), "");
    }

    #[cfg(feature = "gcp")]
    #[test]
    fn test_locate() {
        use super::super::types::SecretKey;

        let key = SecretKey::flat("api_token");
        assert_eq!(GcpSecretBackend::locate(&key), ("api_token", None));

        let key = SecretKey::scoped("ssrs_credentials", "username");
        assert_eq!(GcpSecretBackend::locate(&key), ("ssrs_credentials", Some("username")));
    }

    #[test]
    fn test_config_deserialization_defaults_prefix() {
        let config: GcpBackendConfig =
            serde_json::from_str("{\"project_id\": \"my-project\"}").unwrap();
        assert_eq!(config.project_id, "my-project");
        assert_eq!(config.secret_prefix, "");
    }
}
