//! Database model for stored quote files.

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use quote_storage_core::errors::{DatabaseError, Result};
use quote_storage_core::quotes::{FileDescription, QuoteProvider};

/// Dates are stored as ISO `YYYY-MM-DD` text so lexical order is date order.
pub(crate) const DATE_COLUMN_FORMAT: &str = "%Y-%m-%d";

/// Database model for a stored quote file
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::quote_files)]
#[diesel(primary_key(provider, quote_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteFileDB {
    pub provider: i32,
    pub quote_date: String,
    pub content: Vec<u8>,
    pub updated_at: String,
}

impl QuoteFileDB {
    pub fn new(provider: QuoteProvider, date: NaiveDate, content: Vec<u8>) -> Self {
        Self {
            provider: provider.code(),
            quote_date: date_key(date),
            content,
            updated_at: Utc::now().to_rfc3339(),
        }
    }
}

pub(crate) fn date_key(date: NaiveDate) -> String {
    date.format(DATE_COLUMN_FORMAT).to_string()
}

/// Maps a `(provider, quote_date)` row back to the domain. Rows that no
/// longer decode are reported, not skipped.
pub(crate) fn description_from_row(code: i32, quote_date: &str) -> Result<FileDescription> {
    let provider = QuoteProvider::from_code(code).ok_or_else(|| {
        DatabaseError::CorruptRow(format!("Unknown provider code {} for {}", code, quote_date))
    })?;
    let date = NaiveDate::parse_from_str(quote_date, DATE_COLUMN_FORMAT).map_err(|e| {
        DatabaseError::CorruptRow(format!("Invalid quote_date '{}': {}", quote_date, e))
    })?;
    Ok(FileDescription::new(provider, date))
}
