//! LLM provider and embedding provider traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gpt-4o-mini".to_string(),
            max_tokens: 512,
            temperature: Some(0.0),
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for LLM completion providers (e.g., OpenAI)
///
/// This trait defines the interface for single-shot text generation. The
/// factifier, the LLM classifier, and the query path all go through it,
/// which keeps the pipeline testable with a canned provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text using the provider's default configuration
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with custom configuration
    async fn generate_with_config(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

/// Trait for embedding providers
///
/// Maps text to fixed-dimension vectors suitable for the fact store.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors this provider produces
    fn dimension(&self) -> u64;
}
