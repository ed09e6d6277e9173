//! API route definitions

use crate::handlers::{health, query};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the service routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/query", post(query::query_handler))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
}
