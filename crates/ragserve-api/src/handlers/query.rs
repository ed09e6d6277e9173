//! Query endpoint handler

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ragserve_core::RagQuery;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Query request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// User's question
    #[schema(example = "What is the refund policy?")]
    pub question: String,

    /// Maximum number of chunks to retrieve (defaults to the configured top-k)
    #[schema(example = 3, default = 3)]
    pub top_k: Option<usize>,
}

/// Query response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    /// Original question
    pub question: String,

    /// Generated answer, grounded on the retrieved context
    #[schema(example = "Refunds are processed within 14 days.")]
    pub answer: String,

    /// Concatenated chunk texts used as context
    pub context_used: String,
}

/// Handle RAG query requests
#[utoipa::path(
    post,
    path = "/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query successful", body = QueryResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 404, description = "No relevant chunks found", body = crate::error::ErrorBody),
        (status = 500, description = "Internal error", body = crate::error::ErrorBody)
    )
)]
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    if req.question.trim().is_empty() {
        return Err(AppError::BadRequest("Question cannot be empty".to_string()));
    }

    let top_k = req.top_k.unwrap_or(state.config.retrieval.default_top_k);
    let query = RagQuery::new(req.question).with_top_k(top_k);

    let result = state.pipeline.query(&query).await?;

    Ok((
        StatusCode::OK,
        Json(QueryResponse {
            question: result.question,
            answer: result.answer,
            context_used: result.context_used,
        }),
    ))
}
