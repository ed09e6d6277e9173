//! Ragserve Core - Domain types, errors, and collaborator traits
//!
//! This crate defines the shared contract of the query service:
//! - Request/response domain types (query, retrieved chunk, answer)
//! - Common error types
//! - Traits for the three external collaborators (embedder, vector
//!   index, completion model)
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, EmbeddingProvider, LlmConfig, LlmProvider, LoggingConfig,
    RetrievalConfig, ServerConfig, VectorProvider, VectorStoreConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for query operations
#[derive(Error, Debug)]
pub enum RagError {
    /// The vector index returned zero matches for the query
    #[error("no relevant chunks found in the index")]
    NoMatches,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;

// ============================================================================
// Domain Types
// ============================================================================

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// A question posed against the indexed corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagQuery {
    /// User's question
    pub question: String,

    /// Maximum number of chunks to retrieve
    pub top_k: usize,
}

impl RagQuery {
    /// Create a new query with the default top-k
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set top-k
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
}

/// A chunk returned by the vector index, ranked by similarity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Text payload stored alongside the vector
    pub text: String,

    /// Similarity score (higher is better)
    pub score: f32,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// A grounded answer plus the context it was generated from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Original question
    pub question: String,

    /// Model-generated answer
    pub answer: String,

    /// Concatenated chunk texts the answer was grounded on
    pub context_used: String,
}

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Trait for embedding generation
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Compute a fixed-length embedding vector for a text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension (must match the index's configured dimension)
    fn dimension(&self) -> usize;
}

/// Trait for read-only nearest-neighbour lookup against a pre-built index
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return at most `top_k` nearest chunks, best match first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Trait for LLM completion
#[async_trait::async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for a rendered prompt
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================
