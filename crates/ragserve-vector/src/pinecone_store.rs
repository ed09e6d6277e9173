//! Pinecone implementation of nearest-neighbour lookup
//!
//! Talks to the Pinecone data-plane REST API of a pre-existing index.
//! Each stored vector is expected to carry a `text` metadata field.

use ragserve_core::{RagError, Result, RetrievedChunk, VectorIndex};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pinecone vector index client
pub struct PineconeIndex {
    client: Client,
    index_host: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PineconeQueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct PineconeQueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Debug, Deserialize)]
struct PineconeMatch {
    score: f32,
    #[serde(default)]
    metadata: Option<PineconeMetadata>,
}

#[derive(Debug, Deserialize)]
struct PineconeMetadata {
    #[serde(default)]
    text: String,
}

impl PineconeIndex {
    /// Create a new Pinecone client for an index host
    pub fn new(index_host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut index_host = index_host.into();
        if !index_host.starts_with("http") {
            index_host = format!("https://{index_host}");
        }

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            index_host,
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let request = PineconeQueryRequest {
            vector: vector.to_vec(),
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(format!("{}/query", self.index_host))
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::VectorStore(format!("Pinecone request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::VectorStore(format!(
                "Pinecone error: {error_text}"
            )));
        }

        let result: PineconeQueryResponse = response
            .json()
            .await
            .map_err(|e| RagError::VectorStore(format!("Failed to parse Pinecone response: {e}")))?;

        tracing::debug!(matches = result.matches.len(), "pinecone query completed");

        let chunks = result
            .matches
            .into_iter()
            .map(|m| RetrievedChunk {
                text: m.metadata.map(|meta| meta.text).unwrap_or_default(),
                score: m.score,
            })
            .collect();

        Ok(chunks)
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
