use chrono::NaiveDate;
use quote_storage_core::quotes as core_quotes;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A stored quote file, as listed by `GET /api/quoteList`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileDescription {
    #[schema(example = "WienerBoerse")]
    pub quote_provider: String,
    #[schema(example = "2023-07-08")]
    pub date: NaiveDate,
}

impl From<core_quotes::FileDescription> for FileDescription {
    fn from(d: core_quotes::FileDescription) -> Self {
        Self {
            quote_provider: d.quote_provider.to_string(),
            date: d.date,
        }
    }
}

#[derive(Deserialize, IntoParams, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct QuoteListQuery {
    /// Exchange name; all exchanges when omitted.
    pub quote_provider: Option<String>,
    /// First day, inclusive (`YYYY-MM-DD`).
    pub date_from: String,
    /// Last day, inclusive (`YYYY-MM-DD`).
    pub date_to: String,
}

/// Multipart form accepted by `POST /api/saveFile`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct QuoteFileUpload {
    /// `<ProviderName>_<YYYYMMDD>.csv`, sent as `text/csv`.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
