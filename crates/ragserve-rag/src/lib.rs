//! Ragserve RAG - Retrieval-augmented query pipeline
//!
//! Implements the query orchestration contract: embed the question,
//! retrieve the nearest chunks from the vector index, concatenate their
//! text into a context block, render the fixed grounding prompt, and
//! generate an answer with deterministic decoding.
//!
//! Each request is a single stateless transaction; the three outbound
//! calls run strictly in order and the collaborators are shared,
//! startup-initialized handles.

use ragserve_core::{
    CompletionModel, Embedder, RagAnswer, RagError, RagQuery, Result, RetrievedChunk, VectorIndex,
};
use std::sync::Arc;
use std::time::Instant;

pub mod llm;
pub mod prompt;

pub use llm::{create_completion_model, OllamaCompletion, OpenAiCompletion};

/// Separator between chunk texts in the assembled context
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join retrieved chunk texts in ranked order, one blank line apart
fn assemble_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// The query pipeline, wired to its three external collaborators
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn CompletionModel>,
}

impl QueryPipeline {
    /// Create a new pipeline
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            llm,
        }
    }

    /// Execute a query: embed, retrieve, format, generate
    pub async fn query(&self, query: &RagQuery) -> Result<RagAnswer> {
        let start = Instant::now();

        if query.question.trim().is_empty() {
            return Err(RagError::Validation("Question cannot be empty".to_string()));
        }

        tracing::info!(top_k = query.top_k, "query started");

        let vector = self.embedder.embed(&query.question).await?;
        tracing::debug!(dimension = vector.len(), "question embedded");

        let chunks = self.index.query(&vector, query.top_k).await?;
        tracing::debug!(
            backend = self.index.name(),
            matches = chunks.len(),
            "retrieval completed"
        );

        if chunks.is_empty() {
            return Err(RagError::NoMatches);
        }

        let context = assemble_context(&chunks);
        let rendered = prompt::render(&context, &query.question);

        tracing::debug!(prompt_chars = rendered.len(), "calling LLM");
        let answer = self.llm.complete(&rendered).await?;
        tracing::info!(
            answer_chars = answer.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "query completed"
        );

        Ok(RagAnswer {
            question: query.question.clone(),
            answer,
            context_used: context,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedEmbedder {
        vector: Vec<f32>,
        calls: AtomicUsize,
    }

    impl FixedEmbedder {
        fn new(vector: Vec<f32>) -> Self {
            Self {
                vector,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.vector.clone())
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    struct FixedIndex {
        chunks: Vec<RetrievedChunk>,
        last_top_k: AtomicUsize,
    }

    impl FixedIndex {
        fn new(chunks: Vec<RetrievedChunk>) -> Self {
            Self {
                chunks,
                last_top_k: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl VectorIndex for FixedIndex {
        async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
            self.last_top_k.store(top_k, Ordering::SeqCst);
            Ok(self.chunks.iter().take(top_k).cloned().collect())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct EchoLlm {
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl EchoLlm {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionModel for EchoLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            Ok(format!("answer for prompt of {} chars", prompt.len()))
        }
    }

    fn refund_chunks() -> Vec<RetrievedChunk> {
        vec![
            RetrievedChunk::new("Refunds are processed within 14 days.", 0.92),
            RetrievedChunk::new("Contact support to initiate a refund.", 0.85),
            RetrievedChunk::new("Shipping takes 3-5 business days.", 0.41),
        ]
    }

    fn pipeline_with(
        chunks: Vec<RetrievedChunk>,
    ) -> (QueryPipeline, Arc<FixedIndex>, Arc<EchoLlm>) {
        let embedder = Arc::new(FixedEmbedder::new(vec![0.1, 0.2, 0.3]));
        let index = Arc::new(FixedIndex::new(chunks));
        let llm = Arc::new(EchoLlm::new());
        let pipeline = QueryPipeline::new(embedder, index.clone(), llm.clone());
        (pipeline, index, llm)
    }

    #[tokio::test]
    async fn test_context_is_ranked_join_with_blank_line() {
        let (pipeline, _, _) = pipeline_with(refund_chunks());
        let query = RagQuery::new("What is the refund policy?").with_top_k(2);

        let answer = pipeline.query(&query).await.unwrap();
        assert_eq!(
            answer.context_used,
            "Refunds are processed within 14 days.\n\nContact support to initiate a refund."
        );
        assert_eq!(answer.question, "What is the refund policy?");
    }

    #[tokio::test]
    async fn test_zero_matches_is_not_found_and_llm_never_called() {
        let (pipeline, _, llm) = pipeline_with(vec![]);
        let query = RagQuery::new("anything");

        let err = pipeline.query(&query).await.unwrap_err();
        assert!(matches!(err, RagError::NoMatches));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_top_k_limits_context() {
        let (pipeline, index, _) = pipeline_with(refund_chunks());
        let query = RagQuery::new("refund?").with_top_k(1);

        let answer = pipeline.query(&query).await.unwrap();
        assert_eq!(answer.context_used, "Refunds are processed within 14 days.");
        assert_eq!(index.last_top_k.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prompt_structure() {
        let (pipeline, _, llm) = pipeline_with(refund_chunks());
        let query = RagQuery::new("What is the refund policy?");

        pipeline.query(&query).await.unwrap();

        let sent = llm.last_prompt.lock().unwrap().clone();
        let instruction_pos = sent.find(prompt::SYSTEM_INSTRUCTION).unwrap();
        let context_pos = sent
            .find("Context:\nRefunds are processed within 14 days.")
            .unwrap();
        let question_pos = sent.find("Question: What is the refund policy?").unwrap();
        assert!(instruction_pos < context_pos);
        assert!(context_pos < question_pos);
        assert!(sent.ends_with("Answer:"));
    }

    #[tokio::test]
    async fn test_identical_queries_are_deterministic() {
        let (pipeline, _, _) = pipeline_with(refund_chunks());
        let query = RagQuery::new("What is the refund policy?");

        let first = pipeline.query(&query).await.unwrap();
        let second = pipeline.query(&query).await.unwrap();
        assert_eq!(first.answer, second.answer);
        assert_eq!(first.context_used, second.context_used);
    }

    #[tokio::test]
    async fn test_blank_question_rejected_before_any_call() {
        let embedder = Arc::new(FixedEmbedder::new(vec![0.1]));
        let index = Arc::new(FixedIndex::new(refund_chunks()));
        let llm = Arc::new(EchoLlm::new());
        let pipeline = QueryPipeline::new(embedder.clone(), index, llm.clone());

        let err = pipeline.query(&RagQuery::new("   ")).await.unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_assemble_context_single_chunk() {
        let chunks = vec![RetrievedChunk::new("only one", 0.5)];
        assert_eq!(assemble_context(&chunks), "only one");
    }
}
