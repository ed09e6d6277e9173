//! Ragserve API Server
//!
//! Wires the embedding, vector index, and LLM clients at startup and
//! serves the query endpoint.

use ragserve_api::{create_router, state::AppState};
use ragserve_core::{AppConfig, CompletionModel, Embedder, VectorIndex};
use ragserve_rag::{create_completion_model, QueryPipeline};
use ragserve_vector::{create_embedder, create_vector_index};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match std::env::var("RAGSERVE_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?,
        Err(_) => AppConfig::from_env()?,
    };

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.json_format {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Wire collaborators once; they are shared across requests
    let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config.llm)?);
    let index: Arc<dyn VectorIndex> = Arc::from(create_vector_index(&config.vector).await?);
    let llm: Arc<dyn CompletionModel> = Arc::from(create_completion_model(&config.llm)?);

    if embedder.dimension() != config.vector.dimension {
        tracing::warn!(
            embedder_dimension = embedder.dimension(),
            index_dimension = config.vector.dimension,
            "embedding dimension does not match the configured index dimension; retrieval will fail"
        );
    }

    tracing::info!(
        vector_backend = index.name(),
        model = %config.llm.model,
        embedding_model = %config.llm.embedding_model,
        "collaborators initialized"
    );

    let pipeline = Arc::new(QueryPipeline::new(embedder, index, llm));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pipeline));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Ragserve API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
