//! Error types for jobboard.

use thiserror::Error;

/// Result type alias using jobboard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jobboard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration bookkeeping or execution failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// `CREATE TABLE` ran against a table that already exists
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    /// Live catalog disagrees with a table definition
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Job row not found
    #[error("Job not found: {0}")]
    JobNotFound(i32),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Error::Migration(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_table_already_exists() {
        let err = Error::TableAlreadyExists("jobs".to_string());
        assert_eq!(err.to_string(), "Table already exists: jobs");
    }

    #[test]
    fn test_error_display_job_not_found() {
        let err = Error::JobNotFound(42);
        assert_eq!(err.to_string(), "Job not found: 42");
    }

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = Error::SchemaMismatch("column url is NOT NULL".to_string());
        assert_eq!(err.to_string(), "Schema mismatch: column url is NOT NULL");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("DATABASE_URL is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: DATABASE_URL is not set");
    }

    #[test]
    fn test_from_migrate_error() {
        let err: Error = sqlx::migrate::MigrateError::VersionMissing(20201006111749).into();
        match err {
            Error::Migration(msg) => assert!(msg.contains("20201006111749")),
            _ => panic!("Expected Migration error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
