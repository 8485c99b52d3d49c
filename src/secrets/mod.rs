//! Secret resolution for downstream integrations.
//!
//! This module provides a unified interface for resolving credentials such
//! as report-server logins, database passwords and share-drive paths from
//! interchangeable backends, selected at runtime by configuration.
//!
//! # Architecture
//!
//! The module is built around the [`SecretBackend`] trait, a uniform
//! get/set capability over a keyed store:
//! - **get**: look up a secret value, failing with `NotFound` when absent
//! - **set**: write or overwrite a value, persisting it immediately
//!
//! [`SecretManagerFactory`] maps the `SECRET_MANAGER` discriminator from
//! the configuration source onto one of the concrete backends. The mapping
//! is a static match over the closed [`BackendKind`] set; unknown values
//! fail with a message enumerating the valid ones.
//!
//! # Supported Backends
//!
//! - **HashiCorp Vault**: KV v2 engine, for production deployments
//! - **GCP Secret Manager**: behind the `gcp` cargo feature
//! - **INI file**: flat key/value sections, development and testing
//! - **YAML file**: nested section → key → value mapping, development and
//!   testing
//!
//! # Example
//!
//! ```rust,ignore
//! use credbroker::secrets::{SecretKey, SecretManagerFactory};
//!
//! let factory = SecretManagerFactory::from_file("config.ini")?;
//! let mut backend = factory.resolve().await?;
//!
//! let username = backend.get(&SecretKey::scoped("ssrs_credentials", "username")).await?;
//! backend.set(&SecretKey::flat("api_token"), "rotated-value").await?;
//! ```
//!
//! # Concurrency
//!
//! A backend instance is owned by a single logical task; there is no
//! internal locking and the file-backed variants perform non-atomic
//! read-modify-write cycles over their medium. Callers that share an
//! instance across tasks must supply their own mutual exclusion.

pub mod backend;
pub mod error;
pub mod factory;
pub mod gcp;
pub mod ini;
pub mod types;
pub mod vault;
pub mod yaml;

pub use backend::{BackendKind, SecretBackend};
pub use error::{Result, SecretsError};
pub use factory::SecretManagerFactory;
pub use gcp::GcpBackendConfig;
pub use ini::IniSecretBackend;
pub use types::{SecretKey, SecretString};
pub use vault::{VaultBackendConfig, VaultSecretBackend};
pub use yaml::YamlSecretBackend;

#[cfg(feature = "gcp")]
pub use gcp::GcpSecretBackend;
