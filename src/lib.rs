//! # credbroker
//!
//! Credential resolution and database connection brokering for data
//! integrations. The crate resolves secrets (report-server logins,
//! database passwords, share-drive paths) from one of several
//! interchangeable backends selected at runtime by configuration, and
//! provisions lazily-created, reusable database connections built from
//! those credentials.
//!
//! ## Architecture
//!
//! ```text
//! Configuration Source → Secret Manager Factory → Secret Backend
//!                                                      ↓
//!                            extractors / loaders needing credentials
//!                                                      ↓
//!                          Connection Manager → cached engine + connection
//! ```
//!
//! ## Core Components
//!
//! - **Secret backends**: Vault, GCP Secret Manager (feature-gated), and
//!   INI/YAML files behind one get/set capability
//! - **Factory**: configuration-driven selection from a closed backend set,
//!   failing fast on unknown discriminators
//! - **Connection manager**: validated credentials → connection URL →
//!   lazily-built engine → at-most-one tracked live connection
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use credbroker::{ConnectionManager, SecretKey, SecretManagerFactory};
//!
//! #[tokio::main]
//! async fn main() -> credbroker::Result<()> {
//!     let factory = SecretManagerFactory::from_file("config.ini")?;
//!     let backend = factory.resolve().await?;
//!     let token = backend.get(&SecretKey::flat("api_token")).await?;
//!
//!     let mut db = ConnectionManager::new("postgres", "db_credentials.ini")?;
//!     let conn = db.get_connection().await?;
//!     // ... run queries ...
//!     db.close();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod errors;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::Settings;
pub use connection::{ConnectionError, ConnectionManager, DatabaseConfig, DatabaseKind};
pub use errors::{Error, Result};
pub use observability::init_tracing;
pub use secrets::{
    BackendKind, SecretBackend, SecretKey, SecretManagerFactory, SecretString, SecretsError,
};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "credbroker");
    }
}
