//! API error handling
//!
//! Maps pipeline errors onto the service's wire format: a flat
//! `{"detail": ...}` body with 404 for an empty retrieval result, 400
//! for invalid input, and 500 for any collaborator failure (message
//! passed through verbatim).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ragserve_core::RagError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Detail string returned when retrieval yields zero matches
pub const NO_MATCHES_DETAIL: &str = "No relevant chunks found for this query.";

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error detail
    pub detail: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            AppError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::NoMatches => AppError::NotFound(NO_MATCHES_DETAIL.to_string()),
            RagError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
