//! SQLite-backed quote file store.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, info};
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use quote_storage_core::errors::{DatabaseError, Error, Result};
use quote_storage_core::quotes::{
    FileDescription, QuoteContent, QuoteFileStore, QuoteProvider, QuoteUpload,
};

use super::model::{date_key, description_from_row, QuoteFileDB};
use crate::db::{self, get_connection, DbConnection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::quote_files;

/// Stores each quote file as one row keyed by `(provider, quote_date)`.
///
/// Reads use pooled connections on the blocking thread pool. Writes go
/// through the single writer actor.
pub struct QuoteFileRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuoteFileRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Opens (creating if needed) the database behind `connection_string`,
    /// applies pending migrations and starts the writer.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let db_path = db::init(connection_string)?;
        let pool = db::create_pool(&db_path)?;
        db::run_migrations(&pool)?;
        let writer = db::spawn_writer(&pool)?;
        info!("SQLite quote store ready at {}", db_path);
        Ok(Self::new(pool, writer))
    }

    async fn read<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut DbConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection(&pool)?;
            job(&mut conn)
        })
        .await
        .map_err(|e| Error::from(DatabaseError::Internal(format!("Read task failed: {}", e))))?
    }

    fn get_content_impl(
        conn: &mut SqliteConnection,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<Vec<u8>>> {
        let content = quote_files::table
            .filter(quote_files::provider.eq(provider.code()))
            .filter(quote_files::quote_date.eq(date_key(date)))
            .select(quote_files::content)
            .first::<Vec<u8>>(conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(content)
    }

    fn list_impl(
        conn: &mut SqliteConnection,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        let mut query = quote_files::table
            .select((quote_files::provider, quote_files::quote_date))
            .filter(quote_files::quote_date.ge(date_key(date_from)))
            .filter(quote_files::quote_date.le(date_key(date_to)))
            .order((quote_files::quote_date.asc(), quote_files::provider.asc()))
            .into_boxed();
        if let Some(provider) = provider {
            query = query.filter(quote_files::provider.eq(provider.code()));
        }

        let rows = query
            .load::<(i32, String)>(conn)
            .map_err(StorageError::from)?;
        rows.iter()
            .map(|(code, quote_date)| description_from_row(*code, quote_date))
            .collect()
    }
}

#[async_trait]
impl QuoteFileStore for QuoteFileRepository {
    async fn get_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
    ) -> Result<Option<QuoteContent>> {
        debug!("Start get file {}/{} from DB", provider, date);
        let content = self
            .read(move |conn| Self::get_content_impl(conn, provider, date))
            .await?;

        match content {
            Some(bytes) => {
                info!("File found in DB {}/{} ({} bytes)", provider, date, bytes.len());
                let content: QuoteContent = Box::pin(Cursor::new(bytes));
                Ok(Some(content))
            }
            None => {
                info!("File not found in DB {}/{}", provider, date);
                Ok(None)
            }
        }
    }

    async fn save_file(
        &self,
        provider: QuoteProvider,
        date: NaiveDate,
        content: QuoteUpload<'_>,
    ) -> Result<()> {
        let mut bytes = Vec::new();
        content
            .read_to_end(&mut bytes)
            .await
            .map_err(Error::UploadRead)?;

        let size = bytes.len();
        let row = QuoteFileDB::new(provider, date, bytes);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(quote_files::table)
                    .values(&row)
                    .on_conflict((quote_files::provider, quote_files::quote_date))
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await?;

        info!("Saved {} bytes to DB {}/{}", size, provider, date);
        Ok(())
    }

    async fn get_quote_list(
        &self,
        provider: Option<QuoteProvider>,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<FileDescription>> {
        debug!(
            "Listing {:?} from {} to {} in DB",
            provider, date_from, date_to
        );
        self.read(move |conn| Self::list_impl(conn, provider, date_from, date_to))
            .await
    }

    fn backend_name(&self) -> &'static str {
        "database"
    }
}
