//! OpenAI integration for distill
//!
//! This crate provides the OpenAI implementation of the LlmProvider and
//! EmbeddingProvider traits.

mod client;
mod config;


pub use client::OpenAiClient;
pub use config::OpenAiConfig;

// Re-export core types for convenience
pub use distill_core::{EmbeddingProvider, Error, GenerationConfig, LlmProvider, Result};
