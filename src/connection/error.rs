//! Error types for database connection management.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for connection management operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;

/// Errors that can occur while configuring or establishing database
/// connections.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The credentials configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Missing or invalid configuration (section, field, or value).
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Database-type discriminator outside the supported set.
    #[error("Unsupported database type '{value}' (supported: {supported})")]
    UnsupportedDatabaseType { value: String, supported: String },

    /// Driver-level failure establishing a connection, with the underlying
    /// cause preserved for the caller's retry policy.
    #[error("Failed to establish database connection: {context}")]
    Connect {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// The manager has been shut down; no further connections can be made.
    #[error("Connection manager has been shut down")]
    Closed,
}

impl ConnectionError {
    /// Create a file not found error.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound { path: path.as_ref().to_path_buf() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create an unsupported database type error. `supported` enumerates
    /// the valid discriminator values.
    pub fn unsupported_database_type(
        value: impl Into<String>,
        supported: impl Into<String>,
    ) -> Self {
        Self::UnsupportedDatabaseType { value: value.into(), supported: supported.into() }
    }

    /// Create a connect error wrapping a driver-level cause.
    pub fn connect(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Connect { context: context.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = ConnectionError::file_not_found("/etc/db_credentials.ini");
        assert!(matches!(err, ConnectionError::FileNotFound { .. }));
        assert!(err.to_string().contains("/etc/db_credentials.ini"));

        let err = ConnectionError::config("Missing required field 'db_password'");
        assert!(err.to_string().contains("db_password"));

        let err = ConnectionError::unsupported_database_type("oracle", "mysql, postgres");
        assert!(err.to_string().contains("oracle"));
        assert!(err.to_string().contains("mysql, postgres"));
    }

    #[test]
    fn test_connect_error_preserves_cause() {
        let err = ConnectionError::connect(
            "failed to open connection",
            sqlx::Error::PoolClosed,
        );

        assert!(err.to_string().contains("failed to open connection"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
