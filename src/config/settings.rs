//! # Configuration Settings
//!
//! The configuration source for secret backend selection. A settings value
//! carries the backend discriminator plus the parameter block of each
//! backend that is configured, and is read exactly once (from an INI
//! file or from the environment) then passed explicitly into the
//! factory. There is no process-wide configuration singleton.
//!
//! File layout:
//!
//! ```ini
//! [General]
//! SECRET_MANAGER = yaml
//!
//! [INI]
//! SECRETS_PATH = /etc/credbroker/secrets.ini
//!
//! [YAML]
//! SECRETS_PATH = /etc/credbroker/secrets.yaml
//!
//! [Vault]
//! ADDRESS = https://vault.example.com
//! TOKEN = hvs.XXXX
//! MOUNT = secret
//!
//! [GCP]
//! PROJECT_ID = my-project
//! SECRET_PREFIX = etl-
//! ```

use crate::secrets::{
    GcpBackendConfig, SecretString, SecretsError, VaultBackendConfig,
};
use ini::Ini;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, SecretsError>;

/// Parameters of a file-backed secret backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileBackendSettings {
    /// Path of the secrets file
    pub secrets_path: PathBuf,
}

/// Backend selection settings.
///
/// `secret_manager` is kept as the raw configured string; the factory
/// validates it against the closed set of backend kinds so that an unknown
/// value fails with a message enumerating the valid set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Backend discriminator (`General.SECRET_MANAGER`)
    pub secret_manager: String,

    /// INI backend parameters
    pub ini: Option<FileBackendSettings>,

    /// YAML backend parameters
    pub yaml: Option<FileBackendSettings>,

    /// Vault backend parameters
    pub vault: Option<VaultBackendConfig>,

    /// GCP Secret Manager backend parameters
    pub gcp: Option<GcpBackendConfig>,
}

impl Settings {
    /// Load settings from an INI configuration file.
    ///
    /// Fails with a configuration error when the file cannot be read or
    /// `General.SECRET_MANAGER` is missing, before any backend exists.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = Ini::load_from_file(path).map_err(|e| {
            SecretsError::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let secret_manager = doc
            .get_from(Some("General"), "SECRET_MANAGER")
            .ok_or_else(|| {
                SecretsError::config(format!(
                    "SECRET_MANAGER is not defined in the [General] section of {}",
                    path.display()
                ))
            })?
            .to_string();

        let file_settings = |section: &str| -> Option<FileBackendSettings> {
            doc.get_from(Some(section), "SECRETS_PATH")
                .map(|p| FileBackendSettings { secrets_path: PathBuf::from(p) })
        };

        let vault = doc.get_from(Some("Vault"), "ADDRESS").map(|address| VaultBackendConfig {
            address: address.to_string(),
            token: doc.get_from(Some("Vault"), "TOKEN").map(SecretString::from),
            namespace: doc.get_from(Some("Vault"), "NAMESPACE").map(str::to_string),
            mount_path: doc
                .get_from(Some("Vault"), "MOUNT")
                .unwrap_or("secret")
                .to_string(),
        });

        let gcp = doc.get_from(Some("GCP"), "PROJECT_ID").map(|project_id| GcpBackendConfig {
            project_id: project_id.to_string(),
            secret_prefix: doc.get_from(Some("GCP"), "SECRET_PREFIX").unwrap_or("").to_string(),
        });

        debug!(
            path = %path.display(),
            secret_manager = %secret_manager,
            "Loaded backend selection settings"
        );

        Ok(Self { secret_manager, ini: file_settings("INI"), yaml: file_settings("YAML"), vault, gcp })
    }

    /// Load settings from environment variables.
    ///
    /// Uses `CREDBROKER_SECRET_MANAGER` as the discriminator,
    /// `CREDBROKER_INI_SECRETS_PATH` / `CREDBROKER_YAML_SECRETS_PATH` for
    /// the file backends, and the variables documented on
    /// [`VaultBackendConfig::from_env`] and [`GcpBackendConfig::from_env`]
    /// for the cloud backends.
    pub fn from_env() -> Result<Self> {
        let secret_manager = std::env::var("CREDBROKER_SECRET_MANAGER").map_err(|_| {
            SecretsError::config("CREDBROKER_SECRET_MANAGER is not set in the environment")
        })?;

        let file_settings = |var: &str| -> Option<FileBackendSettings> {
            std::env::var(var)
                .ok()
                .map(|p| FileBackendSettings { secrets_path: PathBuf::from(p) })
        };

        Ok(Self {
            secret_manager,
            ini: file_settings("CREDBROKER_INI_SECRETS_PATH"),
            yaml: file_settings("CREDBROKER_YAML_SECRETS_PATH"),
            vault: VaultBackendConfig::from_env()?,
            gcp: GcpBackendConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_from_file_minimal() {
        let file = write_config("[General]\nSECRET_MANAGER = yaml\n[YAML]\nSECRETS_PATH = /tmp/secrets.yaml\n");
        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.secret_manager, "yaml");
        let yaml = settings.yaml.expect("yaml block should be present");
        assert_eq!(yaml.secrets_path, PathBuf::from("/tmp/secrets.yaml"));
        assert!(settings.ini.is_none());
        assert!(settings.vault.is_none());
    }

    #[test]
    fn test_from_file_vault_block() {
        let file = write_config(
            "[General]\nSECRET_MANAGER = vault\n[Vault]\nADDRESS = http://localhost:8200\nTOKEN = hvs.abc\n",
        );
        let settings = Settings::from_file(file.path()).unwrap();

        let vault = settings.vault.expect("vault block should be present");
        assert_eq!(vault.address, "http://localhost:8200");
        assert_eq!(vault.mount_path, "secret");
        assert_eq!(vault.token.unwrap().expose_secret(), "hvs.abc");
    }

    #[test]
    fn test_from_file_missing_discriminator() {
        let file = write_config("[General]\nOTHER = x\n");
        let err = Settings::from_file(file.path()).unwrap_err();

        assert!(matches!(err, SecretsError::Config { .. }));
        assert!(err.to_string().contains("SECRET_MANAGER"));
    }

    #[test]
    fn test_from_file_missing_file() {
        let err = Settings::from_file("/nonexistent/config.ini").unwrap_err();
        assert!(matches!(err, SecretsError::Config { .. }));
    }
}
