//! Quote file storage trait.
//!
//! This module defines the storage interface for quote files. The trait
//! abstracts the persistence layer so the database and filesystem backends
//! can be used interchangeably behind an `Arc<dyn QuoteFileStore>`.
//!
//! # Cancellation
//!
//! Every operation is an `async fn`. Dropping the returned future abandons the
//! operation; implementations guarantee that an abandoned `save_file` never
//! leaves partially written content visible to readers.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::pin::Pin;
use tokio::io::AsyncRead;

use super::model::{FileDescription, QuoteProvider};
use crate::errors::Result;

/// Readable content of a stored quote file.
///
/// The handle is owned by the caller; any file handle or buffer behind it is
/// released when it is dropped.
pub type QuoteContent = Pin<Box<dyn AsyncRead + Send>>;

/// Input stream handed to [`QuoteFileStore::save_file`].
pub type QuoteUpload<'a> = &'a mut (dyn AsyncRead + Send + Unpin);

/// Storage interface for quote files keyed by `(provider, date)`.
///
/// Implementations must be safe to share between concurrent requests and
/// must not be mutated after construction.
#[async_trait]
pub trait QuoteFileStore: Send + Sync {
    /// Opens the stored content for the exact key.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when nothing is stored for the key. Failures to reach the
    /// store are errors.
    async fn get_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<QuoteContent>>;

    /// Persists the full content of `content` under the key.
    ///
    /// Any previous content for the key is replaced. The input is drained to
    /// the end; a read failure aborts the save and leaves the previous
    /// content in place.
    async fn save_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
        content: QuoteUpload<'_>,
    ) -> Result<()>;

    /// Lists the stored files with `date_from <= date <= date_to`.
    ///
    /// `provider = None` means every known provider. Results are ordered by
    /// date, then by provider enumeration order. Callers guarantee
    /// `date_from <= date_to`.
    async fn get_quote_list(
        &self,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Sorts descriptions into the order promised by [`QuoteFileStore::get_quote_list`].
pub fn sort_descriptions(descriptions: &mut [FileDescription]) {
    descriptions.sort_by_key(|d| (d.date, d.quote_provider.code()));
}
