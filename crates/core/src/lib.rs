//! Quote Storage Core - Domain types, services, and traits.
//!
//! This crate contains the backend-agnostic part of the quote storage
//! service. It defines the [`quotes::QuoteFileStore`] trait that is
//! implemented by the `storage-sqlite` and `storage-fs` crates.

pub mod config;
pub mod errors;
pub mod quotes;

pub use config::{StorageConfiguration, StorageSettings, StorageType};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
