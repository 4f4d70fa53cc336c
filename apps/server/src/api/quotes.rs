use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{FileDescription, QuoteListQuery},
};
use quote_storage_core::quotes::CSV_CONTENT_TYPE;

use super::shared::{parse_date, parse_provider, parse_provider_filter};

/// Stores the first multipart part that carries a file name.
#[utoipa::path(
    post,
    path = "/api/saveFile",
    request_body(content_type = "multipart/form-data", content = crate::models::QuoteFileUpload),
    responses(
        (status = 200, description = "File stored"),
        (status = 400, description = "Invalid file name, content type or form", body = String),
        (status = 500, description = "Storage failure", body = String)
    )
)]
pub async fn save_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        tracing::debug!(
            "Received upload '{}' ({})",
            file_name,
            content_type.as_deref().unwrap_or("no content type")
        );

        let stream = field.map_err(io::Error::other);
        let mut reader = StreamReader::new(Box::pin(stream));
        state
            .quote_file_service
            .save_uploaded_file(&file_name, content_type.as_deref(), &mut reader)
            .await?;
        return Ok(StatusCode::OK);
    }

    Err(ApiError::BadRequest("File must be provided".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/quoteList",
    params(QuoteListQuery),
    responses(
        (status = 200, body = [FileDescription]),
        (status = 400, description = "Invalid provider or date range", body = String)
    )
)]
pub async fn get_quote_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteListQuery>,
) -> ApiResult<Json<Vec<FileDescription>>> {
    let provider = parse_provider_filter(query.quote_provider.as_deref())?;
    let date_from = parse_date(&query.date_from, "dateFrom")?;
    let date_to = parse_date(&query.date_to, "dateTo")?;

    let list = state
        .quote_file_service
        .get_quote_list(provider, date_from, date_to)
        .await?;
    Ok(Json(list.into_iter().map(FileDescription::from).collect()))
}

/// Streams one stored file as `text/csv`.
#[utoipa::path(
    get,
    path = "/api/quoteSingle/{quoteProvider}/{date}",
    params(
        ("quoteProvider" = String, Path, description = "Exchange name"),
        ("date" = String, Path, description = "Quote date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "File content", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid provider or date", body = String),
        (status = 404, description = "No file stored for this key", body = String)
    )
)]
pub async fn get_quote_single(
    State(state): State<Arc<AppState>>,
    Path((quote_provider, date)): Path<(String, String)>,
) -> ApiResult<Response> {
    let provider = parse_provider(&quote_provider)?;
    let date = parse_date(&date, "date")?;

    let content = state
        .quote_file_service
        .get_quote_single(provider, date)
        .await?
        .ok_or(ApiError::NotFound)?;

    let body = Body::from_stream(ReaderStream::new(content));
    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], body).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/saveFile", post(save_file))
        .route("/quoteList", get(get_quote_list))
        .route("/quoteSingle/{quote_provider}/{date}", get(get_quote_single))
}
