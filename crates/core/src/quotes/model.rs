//! Domain models for quote files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::FileNameError;

/// Date format used in stored file names (`20230708`).
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Extension of every stored quote file.
pub const FILE_EXTENSION: &str = "csv";

// =============================================================================
// QuoteProvider
// =============================================================================

/// Exchanges that publish quote files.
///
/// The set is closed: adding a provider means adding a variant here. The
/// numeric code is the declaration index and is what the database variant
/// persists, so existing variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuoteProvider {
    ShanghaiFuturesExchange,
    WienerBoerse,
}

impl QuoteProvider {
    /// Every provider, in enumeration order.
    pub const ALL: [QuoteProvider; 2] = [
        QuoteProvider::ShanghaiFuturesExchange,
        QuoteProvider::WienerBoerse,
    ];

    /// Registered name, used in file names and directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteProvider::ShanghaiFuturesExchange => "ShanghaiFuturesExchange",
            QuoteProvider::WienerBoerse => "WienerBoerse",
        }
    }

    /// Stable numeric discriminator.
    pub fn code(&self) -> i32 {
        match self {
            QuoteProvider::ShanghaiFuturesExchange => 0,
            QuoteProvider::WienerBoerse => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Case-insensitive lookup, used for query and path parameters.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
    }

    /// Either this provider alone, or every provider when `None`.
    pub fn selection(provider: Option<QuoteProvider>) -> Vec<QuoteProvider> {
        match provider {
            Some(p) => vec![p],
            None => Self::ALL.to_vec(),
        }
    }
}

impl fmt::Display for QuoteProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuoteProvider {
    type Err = FileNameError;

    /// Exact, case-sensitive match on the registered name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| FileNameError::UnsupportedProvider(s.to_string()))
    }
}

// =============================================================================
// QuoteKey
// =============================================================================

/// Identity of one stored quote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuoteKey {
    pub provider: QuoteProvider,
    pub date: NaiveDate,
}

impl QuoteKey {
    pub fn new(provider: QuoteProvider, date: NaiveDate) -> Self {
        Self { provider, date }
    }

    /// Canonical upload name, e.g. `WienerBoerse_20230708.csv`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.provider,
            self.date.format(FILE_DATE_FORMAT),
            FILE_EXTENSION
        )
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.date)
    }
}

/// `YYYYMMDD.csv` for the given date.
pub fn stored_file_name(date: NaiveDate) -> String {
    format!("{}.{}", date.format(FILE_DATE_FORMAT), FILE_EXTENSION)
}

// =============================================================================
// FileDescription
// =============================================================================

/// A quote file known to exist in storage. Carries no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescription {
    pub quote_provider: QuoteProvider,
    pub date: NaiveDate,
}

impl FileDescription {
    pub fn new(quote_provider: QuoteProvider, date: NaiveDate) -> Self {
        Self {
            quote_provider,
            date,
        }
    }
}

impl From<QuoteKey> for FileDescription {
    fn from(key: QuoteKey) -> Self {
        Self::new(key.provider, key.date)
    }
}
