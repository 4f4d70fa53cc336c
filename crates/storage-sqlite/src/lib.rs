//! SQLite storage implementation for the quote storage service.
//!
//! This crate is the only place where Diesel dependencies exist. It provides:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - [`QuoteFileRepository`], the database-backed
//!   [`QuoteFileStore`](quote_storage_core::quotes::QuoteFileStore)
//!
//! ```text
//! quote-storage-core (traits)
//!          │
//!          ▼
//! quote-storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod quote_files;
pub mod schema;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};
pub use errors::{IntoCore, StorageError};
pub use quote_files::{QuoteFileDB, QuoteFileRepository};

pub use quote_storage_core::errors::{DatabaseError, Error, Result};
