//! Ragserve Vector - Embedding and vector index clients
//!
//! Provides the two retrieval-side collaborators of the query pipeline:
//! embedding generation (OpenAI, Ollama) and nearest-neighbour lookup
//! against a pre-built index (Qdrant, Pinecone). The index is read-only
//! from this service's perspective; ingestion happens elsewhere.

pub mod embedding;
pub mod pinecone_store;
pub mod qdrant_store;

pub use embedding::{create_embedder, OllamaEmbedding, OpenAiEmbedding};
pub use pinecone_store::PineconeIndex;
pub use qdrant_store::QdrantIndex;

use ragserve_core::{RagError, Result, VectorIndex, VectorProvider, VectorStoreConfig};

/// Create a vector index client from config
pub async fn create_vector_index(config: &VectorStoreConfig) -> Result<Box<dyn VectorIndex>> {
    match config.provider {
        VectorProvider::Qdrant => Ok(Box::new(QdrantIndex::new(config)?)),
        VectorProvider::Pinecone => {
            let api_key = config
                .pinecone_api_key
                .as_ref()
                .ok_or_else(|| RagError::Config("Pinecone API key required".to_string()))?;
            let host = config
                .pinecone_index_host
                .as_ref()
                .ok_or_else(|| RagError::Config("Pinecone index host required".to_string()))?;
            Ok(Box::new(PineconeIndex::new(host.clone(), api_key.clone())))
        }
    }
}
