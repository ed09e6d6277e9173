//! Configuration management
//!
//! Handles configuration from environment variables and TOML config
//! files with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Vector store connection
    pub vector: VectorStoreConfig,

    /// LLM and embedding provider configuration
    pub llm: LlmConfig,

    /// Retrieval parameters
    pub retrieval: RetrievalConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Vector store
        if let Ok(provider) = std::env::var("VECTOR_PROVIDER") {
            config.vector.provider = provider.parse()?;
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            config.vector.qdrant_url = url;
        }
        if let Ok(collection) = std::env::var("QDRANT_COLLECTION") {
            config.vector.qdrant_collection = collection;
        }
        if let Ok(key) = std::env::var("PINECONE_API_KEY") {
            config.vector.pinecone_api_key = Some(key);
        }
        if let Ok(host) = std::env::var("PINECONE_INDEX_HOST") {
            config.vector.pinecone_index_host = Some(host);
        }
        if let Ok(dim) = std::env::var("VECTOR_DIMENSION") {
            config.vector.dimension = dim.parse().map_err(|_| ConfigError::InvalidValue {
                key: "VECTOR_DIMENSION".to_string(),
                value: dim,
            })?;
        }

        // LLM
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider.parse()?;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            config.llm.groq_api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OLLAMA_URL") {
            config.llm.ollama_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(provider) = std::env::var("EMBEDDING_PROVIDER") {
            config.llm.embedding_provider = provider.parse()?;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(secs) = std::env::var("LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "LLM_TIMEOUT_SECS".to_string(),
                value: secs,
            })?;
        }

        // Retrieval
        if let Ok(k) = std::env::var("DEFAULT_TOP_K") {
            config.retrieval.default_top_k =
                k.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "DEFAULT_TOP_K".to_string(),
                    value: k,
                })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_enabled: true,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Vector store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Which vector store backend to query
    pub provider: VectorProvider,

    /// Qdrant gRPC URL
    pub qdrant_url: String,

    /// Qdrant collection name
    pub qdrant_collection: String,

    /// Pinecone API key
    pub pinecone_api_key: Option<String>,

    /// Pinecone index host, e.g. "my-index-abc123.svc.us-east-1.pinecone.io"
    pub pinecone_index_host: Option<String>,

    /// Vector dimension (must match the embedding model)
    pub dimension: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            provider: VectorProvider::Qdrant,
            qdrant_url: "http://localhost:6334".to_string(),
            qdrant_collection: "rag_chunks".to_string(),
            pinecone_api_key: None,
            pinecone_index_host: None,
            dimension: 384, // all-minilm
        }
    }
}

/// Supported vector store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorProvider {
    Qdrant,
    Pinecone,
}

impl std::str::FromStr for VectorProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qdrant" => Ok(Self::Qdrant),
            "pinecone" => Ok(Self::Pinecone),
            _ => Err(ConfigError::InvalidValue {
                key: "VECTOR_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// LLM and embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider to use for answer generation
    pub provider: LlmProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for compatible APIs)
    pub openai_base_url: Option<String>,

    /// Groq API key
    pub groq_api_key: Option<String>,

    /// Ollama server URL
    pub ollama_url: String,

    /// Model name for completion
    pub model: String,

    /// Embedding provider
    pub embedding_provider: EmbeddingProvider,

    /// Embedding model name
    pub embedding_model: String,

    /// Maximum tokens for completion
    pub max_tokens: u32,

    /// Temperature for generation (0.0 for deterministic decoding)
    pub temperature: f32,

    /// Per-call request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Groq,
            openai_api_key: None,
            openai_base_url: None,
            groq_api_key: None,
            ollama_url: "http://localhost:11434".to_string(),
            model: "llama3-70b-8192".to_string(),
            embedding_provider: EmbeddingProvider::Ollama,
            embedding_model: "all-minilm".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Groq,
    Ollama,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::InvalidValue {
                key: "LLM_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    OpenAI,
    Ollama,
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::InvalidValue {
                key: "EMBEDDING_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Retrieval parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved when the request does not specify top_k
    pub default_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: crate::DEFAULT_TOP_K,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.vector.dimension, 384);
        assert_eq!(config.retrieval.default_top_k, 3);
        assert_eq!(config.llm.temperature, 0.0);
    }

    #[test]
    fn test_llm_provider_parse() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert_eq!("groq".parse::<LlmProvider>().unwrap(), LlmProvider::Groq);
        assert_eq!("ollama".parse::<LlmProvider>().unwrap(), LlmProvider::Ollama);
        assert!("invalid".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_vector_provider_parse() {
        assert_eq!(
            "qdrant".parse::<VectorProvider>().unwrap(),
            VectorProvider::Qdrant
        );
        assert_eq!(
            "Pinecone".parse::<VectorProvider>().unwrap(),
            VectorProvider::Pinecone
        );
        assert!("chroma".parse::<VectorProvider>().is_err());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            cors_enabled = false
            cors_origins = []

            [vector]
            provider = "pinecone"
            qdrant_url = "http://localhost:6334"
            qdrant_collection = "rag_chunks"
            pinecone_index_host = "idx-abc.svc.pinecone.io"
            dimension = 1536

            [llm]
            provider = "openai"
            ollama_url = "http://localhost:11434"
            model = "gpt-4o-mini"
            embedding_provider = "openai"
            embedding_model = "text-embedding-3-small"
            max_tokens = 512
            temperature = 0.0
            timeout_secs = 30

            [retrieval]
            default_top_k = 5

            [logging]
            level = "debug"
            json_format = false
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.vector.provider, VectorProvider::Pinecone);
        assert_eq!(config.llm.provider, LlmProvider::OpenAI);
        assert_eq!(config.retrieval.default_top_k, 5);
    }
}
