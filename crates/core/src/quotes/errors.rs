//! Quote-file naming errors.

use thiserror::Error;

/// Reasons an uploaded file name does not identify a quote file.
///
/// The display strings are returned verbatim to HTTP clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileNameError {
    #[error("Invalid uploaded file name")]
    InvalidFormat(String),

    #[error("Unsupported exchange")]
    UnsupportedProvider(String),

    #[error("Supports only csv files")]
    UnsupportedExtension(String),

    #[error("Invalid filename. Invalid date")]
    InvalidDate(String),
}
