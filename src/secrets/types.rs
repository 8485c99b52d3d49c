//! Key and value types for secret resolution.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Identifier for a secret within a backend.
///
/// Backends address secrets differently: an INI file holds flat keys in a
/// fixed section, while YAML files, Vault and GCP address a named field
/// inside a section, path or payload. A [`Flat`](SecretKey::Flat) key is
/// resolved against the backend's default scope where one applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SecretKey {
    /// A bare key, resolved against the backend's default scope.
    Flat(String),
    /// A (section, key) pair.
    Scoped { section: String, key: String },
}

impl SecretKey {
    /// Create a flat key.
    pub fn flat(key: impl Into<String>) -> Self {
        Self::Flat(key.into())
    }

    /// Create a (section, key) pair.
    pub fn scoped(section: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Scoped { section: section.into(), key: key.into() }
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(key) => write!(f, "{}", key),
            Self::Scoped { section, key } => write!(f, "{}/{}", section, key),
        }
    }
}

impl From<&str> for SecretKey {
    fn from(key: &str) -> Self {
        Self::flat(key)
    }
}

impl From<(&str, &str)> for SecretKey {
    fn from((section, key): (&str, &str)) -> Self {
        Self::scoped(section, key)
    }
}

/// A string wrapper that redacts its contents in Debug, Display, and
/// serialization.
///
/// Used for passwords and tokens held in configuration structs so they
/// cannot leak through logging or serialized output. Memory is zeroed when
/// the value is dropped. The actual value is only reachable through
/// [`expose_secret`](SecretString::expose_secret).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value. Never log or print the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Never serialize the actual secret value.
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(SecretString(value))
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Default for SecretString {
    fn default() -> Self {
        Self::new("")
    }
}
