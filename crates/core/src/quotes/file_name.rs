//! Parsing of uploaded file names such as `ShanghaiFuturesExchange_20230708.csv`.

use chrono::NaiveDate;

use super::errors::FileNameError;
use super::model::{QuoteKey, QuoteProvider, FILE_DATE_FORMAT};

const CSV_SUFFIX: &str = ".csv";

impl QuoteKey {
    /// Derives the storage key from an uploaded file name.
    ///
    /// The name must be `<ProviderName>_<YYYYMMDD>.csv`: provider matched
    /// case-sensitively, extension matched case-insensitively, date exactly
    /// eight digits.
    pub fn from_file_name(file_name: &str) -> Result<Self, FileNameError> {
        let name = file_name.trim();
        let parts: Vec<&str> = name
            .split('_')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let [provider_part, date_part] = parts.as_slice() else {
            return Err(FileNameError::InvalidFormat(name.to_string()));
        };

        let provider: QuoteProvider = provider_part.parse()?;

        let date_digits = strip_csv_suffix(date_part)
            .ok_or_else(|| FileNameError::UnsupportedExtension(name.to_string()))?;
        let date = parse_file_date(date_digits)
            .ok_or_else(|| FileNameError::InvalidDate(name.to_string()))?;

        Ok(QuoteKey::new(provider, date))
    }
}

fn strip_csv_suffix(segment: &str) -> Option<&str> {
    let split_at = segment.len().checked_sub(CSV_SUFFIX.len())?;
    if !segment.is_char_boundary(split_at) {
        return None;
    }
    let (stem, suffix) = segment.split_at(split_at);
    suffix.eq_ignore_ascii_case(CSV_SUFFIX).then_some(stem)
}

/// Parses exactly eight ASCII digits as `YYYYMMDD`.
pub fn parse_file_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(digits, FILE_DATE_FORMAT).ok()
}
