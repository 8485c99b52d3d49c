//! # Configuration Management
//!
//! Typed configuration for backend selection, read once at startup and
//! passed explicitly to the components that need it.

mod settings;

pub use settings::{FileBackendSettings, Settings};
