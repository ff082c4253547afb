//! HTTP error mapping.
//!
//! Missing input and unknown ids never reach this type: handlers answer them
//! with a redirect. What is left are failures of the request itself.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Store or storage failure; fatal for this request only.
    Database(midibox_core::Error),
    BadRequest(String),
    NotFound(String),
    /// Malformed or oversized multipart body.
    Multipart(MultipartError),
    Internal(String),
}

impl From<midibox_core::Error> for ApiError {
    fn from(err: midibox_core::Error) -> Self {
        match err {
            midibox_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            midibox_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Database(other),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Multipart(err) => (err.status(), err.body_text()),
            ApiError::Internal(msg) => {
                error!(subsystem = "api", error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
