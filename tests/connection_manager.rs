//! Integration tests for the connection manager's configuration and
//! state-machine surface.
//!
//! Everything here runs without a database: construction, validation, URL
//! templating, lazy engine caching, and the close/shutdown transitions are
//! all observable offline. Tests that open real connections live in
//! `postgres_integration.rs` behind the `postgres_tests` feature.

use credbroker::connection::{ConnectionError, ConnectionManager};
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_credentials(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("db_credentials.ini");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn standard_credentials(dir: &Path, section: &str, port: u16) -> PathBuf {
    write_credentials(
        dir,
        &format!(
            "[{}]\ndb_user = u\ndb_password = p\ndb_host = h\ndb_port = {}\ndb_name = n\n",
            section, port
        ),
    )
}

#[test]
fn test_nonexistent_config_path_fails_before_engine() {
    let err = ConnectionManager::new("postgres", "/no/such/db_credentials.ini").unwrap_err();
    assert!(matches!(err, ConnectionError::FileNotFound { .. }));
}

#[test]
fn test_missing_section_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "mysql", 3306);

    let err = ConnectionManager::new("postgres", &path).unwrap_err();
    assert!(matches!(err, ConnectionError::Config { .. }));
    assert!(err.to_string().contains("postgres"));
}

#[test]
fn test_missing_password_names_the_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_credentials(
        dir.path(),
        "[postgres]\ndb_user = u\ndb_host = h\ndb_port = 5432\ndb_name = n\n",
    );

    let err = ConnectionManager::new("postgres", &path).unwrap_err();
    assert!(matches!(err, ConnectionError::Config { .. }));
    assert!(err.to_string().contains("db_password"));
}

#[test]
fn test_url_templates() {
    let dir = tempfile::tempdir().unwrap();

    let path = standard_credentials(dir.path(), "postgres", 5432);
    let manager = ConnectionManager::new("postgres", &path).unwrap();
    assert_eq!(manager.database_url().unwrap(), "postgresql://u:p@h:5432/n");

    let path = standard_credentials(dir.path(), "mysql", 3306);
    let manager = ConnectionManager::new("mysql", &path).unwrap();
    assert_eq!(manager.database_url().unwrap(), "mysql://u:p@h:3306/n");
}

#[test]
fn test_construction_is_side_effect_free() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "postgres", 5432);

    let manager = ConnectionManager::new("postgres", &path).unwrap();
    assert!(!manager.has_engine());
    assert!(!manager.is_connected());
    assert!(!manager.is_closed());
}

#[test]
fn test_unsupported_db_type_surfaces_at_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "mssql", 1433);

    let mut manager = ConnectionManager::new("mssql", &path).unwrap();
    let err = manager.engine().unwrap_err();

    assert!(matches!(err, ConnectionError::UnsupportedDatabaseType { .. }));
    assert!(err.to_string().contains("mysql, postgres"));
    assert!(!manager.has_engine());
}

#[tokio::test]
async fn test_engine_is_built_once_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "postgres", 5432);

    let mut manager = ConnectionManager::new("postgres", &path).unwrap();
    manager.engine().unwrap();
    assert!(manager.has_engine());
    manager.engine().unwrap();
}

#[test]
fn test_close_with_no_connection_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "postgres", 5432);

    let mut manager = ConnectionManager::new("postgres", &path).unwrap();
    manager.close();
    manager.close();
    assert!(!manager.is_connected());
}

#[tokio::test]
async fn test_shutdown_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let path = standard_credentials(dir.path(), "postgres", 5432);

    let mut manager = ConnectionManager::new("postgres", &path).unwrap();
    manager.engine().unwrap();
    manager.shutdown().await;

    assert!(manager.is_closed());
    assert!(matches!(manager.engine().unwrap_err(), ConnectionError::Closed));
    assert!(matches!(
        manager.get_connection().await.unwrap_err(),
        ConnectionError::Closed
    ));

    // close() remains safe after shutdown.
    manager.close();
}
