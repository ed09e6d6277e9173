//! LLM client implementations
//!
//! Provides completion clients for the OpenAI chat API (including
//! OpenAI-compatible endpoints such as Groq) and Ollama.

use ragserve_core::{CompletionModel, LlmConfig, LlmProvider, RagError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

// ============================================================================
// OpenAI-compatible Chat Client
// ============================================================================

/// Client for the OpenAI chat completions API and compatible endpoints
pub struct OpenAiCompletion {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiCompletion {
    /// Create a new client against the OpenAI API
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    /// Create a client against the Groq OpenAI-compatible API
    pub fn groq(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        Self::new(api_key, model, max_tokens, temperature, timeout_secs)
            .with_base_url(GROQ_BASE_URL)
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        match config.provider {
            LlmProvider::Groq => {
                let api_key = config
                    .groq_api_key
                    .as_ref()
                    .ok_or_else(|| RagError::Config("Groq API key required".to_string()))?;

                Ok(Self::groq(
                    api_key.clone(),
                    config.model.clone(),
                    config.max_tokens,
                    config.temperature,
                    config.timeout_secs,
                ))
            }
            _ => {
                let api_key = config
                    .openai_api_key
                    .as_ref()
                    .ok_or_else(|| RagError::Config("OpenAI API key required".to_string()))?;

                let base_url = config
                    .openai_base_url
                    .clone()
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string());

                Ok(Self::new(
                    api_key.clone(),
                    config.model.clone(),
                    config.max_tokens,
                    config.temperature,
                    config.timeout_secs,
                )
                .with_base_url(base_url))
            }
        }
    }

    /// Set a custom base URL (for OpenAI-compatible APIs)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl CompletionModel for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Llm(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::Llm(format!("Completion error: {error_text}")));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RagError::Llm("No response generated".to_string()))
    }
}

// ============================================================================
// Ollama Client
// ============================================================================

/// Ollama API client
pub struct OllamaCompletion {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaCompletion {
    /// Create a new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: http_client(timeout_secs),
            base_url: base_url.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.ollama_url.clone(),
            config.model.clone(),
            config.temperature,
            config.timeout_secs,
        )
    }
}

#[async_trait::async_trait]
impl CompletionModel for OllamaCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Llm(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::Llm(format!("Ollama error: {error_text}")));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| RagError::Llm(format!("Failed to parse Ollama response: {e}")))?;

        Ok(result.response)
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create a completion client from config
pub fn create_completion_model(config: &LlmConfig) -> Result<Box<dyn CompletionModel>> {
    match config.provider {
        LlmProvider::OpenAI | LlmProvider::Groq => {
            Ok(Box::new(OpenAiCompletion::from_config(config)?))
        }
        LlmProvider::Ollama => Ok(Box::new(OllamaCompletion::from_config(config))),
    }
}

// ============================================================================
// Tests
// ============================================================================
