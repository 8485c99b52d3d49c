//! Error types for secret resolution operations.

use thiserror::Error;

/// Result type for secret resolution operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while resolving or storing secrets.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// Secret not found in the backend.
    #[error("Secret not found: {key}")]
    NotFound { key: String },

    /// Backend discriminator outside the supported set.
    #[error("Unsupported secret backend '{value}' (supported: {supported})")]
    UnsupportedBackend { value: String, supported: String },

    /// The backend medium could not be reached or refused the operation.
    #[error("Secret backend unavailable: {context}")]
    Unavailable {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing or invalid configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an unsupported backend error. `supported` enumerates the
    /// valid discriminator values for operator diagnosability.
    pub fn unsupported_backend(value: impl Into<String>, supported: impl Into<String>) -> Self {
        Self::UnsupportedBackend { value: value.into(), supported: supported.into() }
    }

    /// Create a backend unavailable error without an underlying cause.
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable { context: context.into(), source: None }
    }

    /// Create a backend unavailable error preserving the underlying cause.
    pub fn unavailable_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable { context: context.into(), source: Some(Box::new(source)) }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
