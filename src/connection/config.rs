//! Database credentials configuration.
//!
//! Credentials live in an INI file with one section per database type:
//!
//! ```ini
//! [postgres]
//! db_user = etl
//! db_password = s3cret
//! db_host = db.internal
//! db_port = 5432
//! db_name = warehouse
//! ```
//!
//! The section is loaded and validated in full before any engine or
//! network activity; a missing field is reported by name.

use super::error::{ConnectionError, Result};
use crate::secrets::SecretString;
use ini::Ini;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fields a database configuration section must provide.
const REQUIRED_FIELDS: [&str; 5] = ["db_user", "db_password", "db_host", "db_port", "db_name"];

/// Validated connection parameters for one database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub db_user: String,
    pub db_password: SecretString,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
}

impl DatabaseConfig {
    /// Load the configuration section named `section` from `path`.
    pub fn load(path: impl AsRef<Path>, section: &str) -> Result<Self> {
        let path = path.as_ref();
        let doc = Ini::load_from_file(path).map_err(|e| {
            ConnectionError::config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let props = doc.section(Some(section)).ok_or_else(|| {
            ConnectionError::config(format!(
                "No configuration section found for database type: {}",
                section
            ))
        })?;

        let require = |field: &str| -> Result<&str> {
            props.get(field).ok_or_else(|| {
                ConnectionError::config(format!(
                    "Missing required field '{}' in section '{}'",
                    field, section
                ))
            })
        };

        // Surface the first missing field by name before parsing anything.
        for field in REQUIRED_FIELDS {
            require(field)?;
        }

        let db_port: u16 = require("db_port")?.parse().map_err(|e| {
            ConnectionError::config(format!("Invalid db_port in section '{}': {}", section, e))
        })?;

        Ok(Self {
            db_user: require("db_user")?.to_string(),
            db_password: SecretString::new(require("db_password")?),
            db_host: require("db_host")?.to_string(),
            db_port,
            db_name: require("db_name")?.to_string(),
        })
    }
}
