//! Splitters, fact extraction, classification, and the populate/query
//! paths for distill.

mod classify;
mod factify;
mod memory_store;
mod pipeline;
mod qdrant_store;
mod splitter;
mod summ;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{LlmClassifier, RuleClassifier};
pub use factify::Factifier;
pub use memory_store::MemoryFactStore;
pub use pipeline::{FileFailure, Pipeline, PopulateReport};
pub use qdrant_store::QdrantFactStore;
pub use splitter::{ParagraphSplitter, TurnSplitter};
pub use summ::{QueryResponse, Summ};

// Re-export core types for convenience
pub use distill_core::{
    Chunk, Classifier, ClassifierRegistry, EmbeddingProvider, Error, Fact, FactFilter, FactRecord,
    FactStore, LlmProvider, Result, ScoredFact, Source, Splitter,
};
