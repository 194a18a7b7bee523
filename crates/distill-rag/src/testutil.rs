//! Canned providers for tests

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use distill_core::{EmbeddingProvider, Error, GenerationConfig, LlmProvider, Result};

/// An LLM provider that returns the same response for every prompt.
pub struct StaticProvider {
    response: String,
}

impl StaticProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for StaticProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.response.clone())
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String> {
        self.generate(prompt).await
    }

    fn model_id(&self) -> &str {
        "static"
    }
}

/// An LLM provider that always fails, for exercising error paths.
pub struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::LlmProvider("provider unavailable".to_string()))
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String> {
        self.generate(prompt).await
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

/// Deterministic word-hash embeddings. Similar texts share dimensions, which
/// is enough for retrieval assertions without a hosted model.
pub struct HashEmbedder {
    dimension: u64,
}

impl HashEmbedder {
    pub fn new(dimension: u64) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let dim = self.dimension as usize;
        let mut vector = vec![0.0f32; dim];

        for word in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            vector[(hasher.finish() as usize) % dim] += 1.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> u64 {
        self.dimension
    }
}
