//! API error type.
//!
//! Every handler failure becomes a JSON body `{"error": "..."}` with a
//! matching status code.

use arnote_core::StoreError;
use arnote_renderer::RenderError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::metrics;
use crate::validation::ValidationError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path or body input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body is not valid JSON of the expected shape.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// The config store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Export rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A background task failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::Store(StoreError::InvalidId(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(e) if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Validation(e) => metrics::record_validation_failure(e.kind()),
            _ if status.is_server_error() => tracing::error!("Request failed: {self}"),
            _ => tracing::debug!("Rejected request: {self}"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
