//! Core error types for the quote storage service.
//!
//! This module defines backend-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, the filesystem) are converted to these types by the
//! storage crates.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::quotes::FileNameError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the service.
///
/// "Not found" is deliberately absent: a missing quote file is a valid,
/// successful `None` result of the storage contract.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Filesystem operation failed: {0}")]
    Filesystem(#[from] FilesystemError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to read uploaded content: {0}")]
    UploadRead(#[source] std::io::Error),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Backend-agnostic error type for database operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert Diesel/r2d2 errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be mapped back to a domain value.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Filesystem errors, always carrying the path that was being touched.
#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors for client input. These never reach the storage layer.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{0}")]
    FileName(#[from] FileNameError),

    #[error("Supports only text/csv content type")]
    UnsupportedContentType(String),

    #[error("dateFrom ({from}) is later than dateTo ({to})")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Unsupported exchange: {0}")]
    InvalidProvider(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl From<FileNameError> for Error {
    fn from(err: FileNameError) -> Self {
        Error::Validation(ValidationError::FileName(err))
    }
}
