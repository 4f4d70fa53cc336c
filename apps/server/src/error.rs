use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quote_storage_core::errors::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    /// Errors are answered with a plain-text reason.
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(CoreError::Validation(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Core(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(reason) => {
                tracing::error!("Request failed: {}", reason);
                (StatusCode::INTERNAL_SERVER_ERROR, reason.clone())
            }
        };
        (status, msg).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
