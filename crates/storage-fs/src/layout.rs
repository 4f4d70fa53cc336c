//! On-disk layout: `<base>/<ProviderName>/<YYYYMMDD>.csv`.

use chrono::NaiveDate;
use quote_storage_core::quotes::{stored_file_name, QuoteProvider};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct QuoteFileLayout {
    base_directory: PathBuf,
}

impl QuoteFileLayout {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn provider_dir(&self, provider: QuoteProvider) -> PathBuf {
        self.base_directory.join(provider.as_str())
    }

    pub fn file_path(&self, provider: QuoteProvider, date: NaiveDate) -> PathBuf {
        self.provider_dir(provider).join(stored_file_name(date))
    }

    /// Unique, hidden sibling of the destination used while a save is in flight.
    ///
    /// Lives in the provider directory so the final rename never crosses a
    /// filesystem boundary.
    pub fn temp_path(&self, provider: QuoteProvider, date: NaiveDate) -> PathBuf {
        self.provider_dir(provider).join(format!(
            ".{}.{}.tmp",
            stored_file_name(date),
            uuid::Uuid::new_v4().simple()
        ))
    }
}
