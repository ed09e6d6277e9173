//! Qdrant implementation of nearest-neighbour lookup
//!
//! Queries a pre-existing collection whose points carry a `text` payload
//! field. The collection, its dimension, and its payload schema are
//! provisioned by the ingestion side and treated as external invariants.

use qdrant_client::qdrant::SearchPointsBuilder;
use qdrant_client::Qdrant;
use ragserve_core::{RagError, Result, RetrievedChunk, VectorIndex, VectorStoreConfig};

/// Qdrant vector index client
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    /// Create a new Qdrant connection
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.qdrant_url)
            .build()
            .map_err(|e| RagError::VectorStore(format!("Qdrant connection failed: {e}")))?;

        Ok(Self {
            client,
            collection: config.qdrant_collection.clone(),
        })
    }
}

#[async_trait::async_trait]
impl VectorIndex for QdrantIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RagError::VectorStore(format!("Vector search failed: {e}")))?;

        tracing::debug!(
            collection = %self.collection,
            matches = results.result.len(),
            "qdrant search completed"
        );

        let chunks = results
            .result
            .into_iter()
            .map(|point| {
                let text = point
                    .payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_default();

                RetrievedChunk {
                    text,
                    score: point.score,
                }
            })
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}
