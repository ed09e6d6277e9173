//! Ragserve API - HTTP server
//!
//! Exposes the query pipeline over HTTP: `POST /query` plus health
//! probes and OpenAPI documentation.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::query::query_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        handlers::query::QueryRequest,
        handlers::query::QueryResponse,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "query", description = "RAG query endpoint"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

fn cors_layer(config: &ragserve_core::ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .merge(routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if state.config.server.cors_enabled {
        router = router.layer(cors_layer(&state.config.server));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
