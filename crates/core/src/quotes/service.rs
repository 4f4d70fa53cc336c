//! Quote file service.
//!
//! Sits between the HTTP handlers and the configured [`QuoteFileStore`]:
//! validates client input, then delegates to the backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::Arc;

use super::model::{FileDescription, QuoteKey, QuoteProvider};
use super::store::{QuoteContent, QuoteFileStore, QuoteUpload};
use crate::errors::{Result, ValidationError};

/// The only accepted upload content type.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Trait for quote file service operations
#[async_trait]
pub trait QuoteFileServiceTrait: Send + Sync {
    /// Validates an upload's metadata and stores its content.
    ///
    /// Returns the key the content was stored under.
    async fn save_uploaded_file(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        content: QuoteUpload<'_>,
    ) -> Result<QuoteKey>;

    async fn get_quote_single(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<QuoteContent>>;

    async fn get_quote_list(
        &self,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>>;
}

/// Checks the upload metadata without touching storage.
pub fn validate_upload(file_name: &str, content_type: Option<&str>) -> Result<QuoteKey> {
    let content_type = content_type.unwrap_or_default();
    if !content_type
        .to_ascii_lowercase()
        .contains(CSV_CONTENT_TYPE)
    {
        return Err(ValidationError::UnsupportedContentType(content_type.to_string()).into());
    }
    Ok(QuoteKey::from_file_name(file_name)?)
}

/// Service for storing and retrieving quote files.
pub struct QuoteFileService {
    store: Arc<dyn QuoteFileStore>,
}

impl QuoteFileService {
    pub fn new(store: Arc<dyn QuoteFileStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[async_trait]
impl QuoteFileServiceTrait for QuoteFileService {
    async fn save_uploaded_file(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        content: QuoteUpload<'_>,
    ) -> Result<QuoteKey> {
        info!("Start save file. Validating file name '{}'", file_name);
        let key = validate_upload(file_name, content_type)?;
        debug!("File name valid, saving {}", key);

        self.store
            .save_file(key.provider, key.date, content)
            .await
            .inspect_err(|e| error!("Error while saving file {}: {}", key, e))?;

        info!("Saved {} to {} storage", key, self.store.backend_name());
        Ok(key)
    }

    async fn get_quote_single(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<QuoteContent>> {
        info!("Start get quote file {}/{}", provider, date);
        let content = self.store.get_file(provider, date).await?;
        if content.is_none() {
            info!("Quote file {}/{} not found", provider, date);
        }
        Ok(content)
    }

    async fn get_quote_list(
        &self,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        if date_from > date_to {
            info!("dateFrom {} is later than dateTo {}", date_from, date_to);
            return Err(ValidationError::InvalidDateRange {
                from: date_from,
                to: date_to,
            }
            .into());
        }

        info!("Start get quote list {:?} {}..={}", provider, date_from, date_to);
        let list = self
            .store
            .get_quote_list(provider, date_from, date_to)
            .await?;
        info!("Finish get quote list, {} file(s)", list.len());
        Ok(list)
    }
}
