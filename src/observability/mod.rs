//! # Observability
//!
//! Tracing initialization for binaries and test harnesses embedding this
//! crate. Library code only emits `tracing` events; installing a
//! subscriber is the embedder's call.

use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `log_level` is a default filter directive (e.g. `info`,
/// `credbroker=debug`) that `RUST_LOG` overrides when set. With
/// `json_logging` the subscriber emits structured JSON lines.
pub fn init_tracing(log_level: &str, json_logging: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", log_level, e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result =
        if json_logging { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|e| Error::config(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_log_level_is_rejected() {
        // RUST_LOG would take precedence over the invalid directive.
        std::env::remove_var("RUST_LOG");
        let result = init_tracing("not=a=filter", false);
        assert!(result.is_err());
    }
}
