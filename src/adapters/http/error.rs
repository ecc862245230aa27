//! HTTP mapping of quote errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::QuoteError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error kind (`validation`, `format`, `storage`, `network`).
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Status code and kind label for an error.
pub fn classify(err: &QuoteError) -> (StatusCode, &'static str) {
    match err {
        QuoteError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        QuoteError::Format(_) => (StatusCode::BAD_REQUEST, "format"),
        QuoteError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        QuoteError::Network(_) => (StatusCode::BAD_GATEWAY, "network"),
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let (status, kind) = classify(&self);
        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
