//! Core traits and types for distill
//!
//! This crate defines the fundamental traits and types used across the
//! distill pipeline. It provides capability-facing interfaces for LLM
//! providers, embedding providers, transcript splitters, classifiers, and
//! fact stores, making the system test-friendly and extensible.

pub mod classify;
pub mod error;
pub mod llm;
pub mod splitter;
pub mod store;

pub use classify::{Classifier, ClassifierRegistry};
pub use error::{Error, Result};
pub use llm::{EmbeddingProvider, GenerationConfig, LlmProvider};
pub use splitter::{Chunk, Splitter};
pub use store::{Fact, FactFilter, FactRecord, FactStore, ScoredFact, Source};
