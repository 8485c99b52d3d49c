//! Configuration-driven construction of secret backends.
//!
//! Maps the `SECRET_MANAGER` discriminator from the configuration source
//! onto a concrete backend constructor. The mapping is a static match over
//! the closed [`BackendKind`] set; there is no reflective lookup, and an
//! unknown discriminator fails with a message enumerating the valid values.
//!
//! The factory constructs a fresh backend instance on every [`resolve`]
//! call, uniformly. Callers that rely on write-then-read visibility hold on
//! to the instance they were given rather than resolving twice.
//!
//! [`resolve`]: SecretManagerFactory::resolve

use super::backend::{BackendKind, SecretBackend};
use super::error::{Result, SecretsError};
use super::ini::IniSecretBackend;
use super::vault::VaultSecretBackend;
use super::yaml::YamlSecretBackend;
use crate::config::Settings;
use std::path::Path;
use tracing::info;

/// Factory selecting and constructing the configured secret backend.
#[derive(Debug, Clone)]
pub struct SecretManagerFactory {
    settings: Settings,
}

impl SecretManagerFactory {
    /// Create a factory over already-loaded settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Create a factory from an INI configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Settings::from_file(path)?))
    }

    /// Create a factory from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Settings::from_env()?))
    }

    /// The backend kind this factory would construct.
    ///
    /// Validates the configured discriminator against the closed set.
    pub fn selected_kind(&self) -> Result<BackendKind> {
        self.settings.secret_manager.parse()
    }

    /// Construct the configured secret backend.
    ///
    /// Construction failures (missing file, malformed file, unreachable
    /// endpoint) propagate unmodified; the factory neither swallows nor
    /// retries them.
    pub async fn resolve(&self) -> Result<Box<dyn SecretBackend>> {
        let kind = self.selected_kind()?;
        info!(backend = %kind, "Resolving secret backend");

        match kind {
            BackendKind::Ini => {
                let settings = self.settings.ini.as_ref().ok_or_else(|| {
                    SecretsError::config(
                        "INI backend selected but [INI] SECRETS_PATH is not configured",
                    )
                })?;
                Ok(Box::new(IniSecretBackend::open(&settings.secrets_path)?))
            }
            BackendKind::Yaml => {
                let settings = self.settings.yaml.as_ref().ok_or_else(|| {
                    SecretsError::config(
                        "YAML backend selected but [YAML] SECRETS_PATH is not configured",
                    )
                })?;
                Ok(Box::new(YamlSecretBackend::open(&settings.secrets_path)?))
            }
            BackendKind::Vault => {
                let config = self.settings.vault.clone().ok_or_else(|| {
                    SecretsError::config(
                        "Vault backend selected but [Vault] ADDRESS is not configured",
                    )
                })?;
                Ok(Box::new(VaultSecretBackend::new(config)?))
            }
            #[cfg(feature = "gcp")]
            BackendKind::Gcp => {
                let config = self.settings.gcp.clone().ok_or_else(|| {
                    SecretsError::config(
                        "GCP backend selected but [GCP] PROJECT_ID is not configured",
                    )
                })?;
                Ok(Box::new(super::gcp::GcpSecretBackend::new(config).await?))
            }
            #[cfg(not(feature = "gcp"))]
            BackendKind::Gcp => Err(SecretsError::unavailable(
                "GCP backend selected but credbroker was built without the `gcp` feature",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretKey;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn settings_with_manager(secret_manager: &str) -> Settings {
        Settings {
            secret_manager: secret_manager.to_string(),
            ini: None,
            yaml: None,
            vault: None,
            gcp: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_discriminator_lists_supported_set() {
        let factory = SecretManagerFactory::new(settings_with_manager("AZURE"));
        let err = factory.resolve().await.unwrap_err();

        assert!(matches!(err, SecretsError::UnsupportedBackend { .. }));
        let message = err.to_string();
        for kind in BackendKind::ALL {
            assert!(message.contains(kind.as_str()), "missing {} in: {}", kind, message);
        }
    }

    #[tokio::test]
    async fn test_selected_backend_missing_parameters() {
        let factory = SecretManagerFactory::new(settings_with_manager("yaml"));
        let err = factory.resolve().await.unwrap_err();

        assert!(matches!(err, SecretsError::Config { .. }));
        assert!(err.to_string().contains("SECRETS_PATH"));
    }

    #[tokio::test]
    async fn test_resolve_yaml_backend() {
        let secrets = write_file("Secrets:\n  KEY1: VALUE1\n");
        let mut settings = settings_with_manager("yaml");
        settings.yaml = Some(crate::config::FileBackendSettings {
            secrets_path: secrets.path().to_path_buf(),
        });

        let factory = SecretManagerFactory::new(settings);
        let backend = factory.resolve().await.unwrap();

        assert_eq!(backend.kind(), BackendKind::Yaml);
        let value = backend.get(&SecretKey::scoped("Secrets", "KEY1")).await.unwrap();
        assert_eq!(value, "VALUE1");
    }

    #[tokio::test]
    async fn test_resolve_is_deterministic() {
        let secrets = write_file("[Secrets]\nKEY1 = VALUE1\n");
        let mut settings = settings_with_manager("ini");
        settings.ini = Some(crate::config::FileBackendSettings {
            secrets_path: secrets.path().to_path_buf(),
        });

        let factory = SecretManagerFactory::new(settings);
        for _ in 0..3 {
            let backend = factory.resolve().await.unwrap();
            assert_eq!(backend.kind(), BackendKind::Ini);
        }
    }

    #[tokio::test]
    async fn test_resolve_vault_backend_constructs_without_io() {
        use crate::secrets::VaultBackendConfig;

        let mut settings = settings_with_manager("vault");
        settings.vault = Some(VaultBackendConfig {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            mount_path: "secret".to_string(),
        });

        // Construction is side-effect-free; reachability surfaces on use.
        let backend = SecretManagerFactory::new(settings).resolve().await.unwrap();
        assert_eq!(backend.kind(), BackendKind::Vault);
    }

    #[tokio::test]
    async fn test_construction_failure_propagates() {
        let mut settings = settings_with_manager("ini");
        settings.ini = Some(crate::config::FileBackendSettings {
            secrets_path: "/nonexistent/secrets.ini".into(),
        });

        let factory = SecretManagerFactory::new(settings);
        let err = factory.resolve().await.unwrap_err();
        assert!(matches!(err, SecretsError::Unavailable { .. }));
    }
}
