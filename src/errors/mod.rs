//! # Error Handling
//!
//! Top-level error composition. Each subsystem defines its own `thiserror`
//! enum; this module stitches them together for callers working across
//! both.

use crate::connection::ConnectionError;
use crate::secrets::SecretsError;

/// Custom result type for credbroker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for credbroker
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Secret resolution errors
    #[error(transparent)]
    Secrets(#[from] SecretsError),

    /// Database connection errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Configuration errors outside either subsystem
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}
