use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quote_storage_core::errors::{Error as CoreError, ValidationError};
use quote_storage_core::quotes::{parse_file_date, QuoteProvider};

use crate::error::ApiError;

/// Provider from a query or path parameter: registered name in any case, or
/// its numeric code.
pub fn parse_provider(raw: &str) -> Result<QuoteProvider, ApiError> {
    let raw = raw.trim();
    QuoteProvider::parse_lenient(raw)
        .or_else(|| raw.parse::<i32>().ok().and_then(QuoteProvider::from_code))
        .ok_or_else(|| CoreError::from(ValidationError::InvalidProvider(raw.to_string())).into())
}

/// Optional provider filter; an empty value means "all providers".
pub fn parse_provider_filter(raw: Option<&str>) -> Result<Option<QuoteProvider>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_provider(raw).map(Some),
        None => Ok(None),
    }
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, or an ISO-8601 date-time (the time part
/// is ignored).
pub fn parse_date(raw: &str, name: &str) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_file_date(raw))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| {
            CoreError::from(ValidationError::InvalidDate(format!("{} '{}'", name, raw))).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_date_shapes() {
        assert_eq!(parse_date("2023-07-08", "date").unwrap(), date(2023, 7, 8));
        assert_eq!(parse_date("20230708", "date").unwrap(), date(2023, 7, 8));
        assert_eq!(parse_date("2023-07-08T13:45:00", "date").unwrap(), date(2023, 7, 8));
        assert_eq!(parse_date("2023-07-08T23:00:00+02:00", "date").unwrap(), date(2023, 7, 8));
    }

    #[test]
    fn rejects_invalid_dates() {
        for raw in ["", "2023-02-30", "08.07.2023", "2023078", "yesterday"] {
            assert!(matches!(parse_date(raw, "dateFrom"), Err(ApiError::Core(_))), "{raw}");
        }
    }

    #[test]
    fn providers_match_by_name_or_code() {
        assert_eq!(parse_provider("wienerboerse").unwrap(), QuoteProvider::WienerBoerse);
        assert_eq!(parse_provider("0").unwrap(), QuoteProvider::ShanghaiFuturesExchange);
        assert!(parse_provider("NYSE").is_err());
        assert!(parse_provider("7").is_err());
        assert_eq!(parse_provider_filter(Some("  ")).unwrap(), None);
        assert_eq!(parse_provider_filter(None).unwrap(), None);
    }
}
