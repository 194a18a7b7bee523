//! Fact store trait and record types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// A reference to an origin file, its assigned classes, and the raw chunk
/// text it came from. Created once per chunk during populate; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub file: String,
    pub classes: Vec<String>,
    pub chunk: String,
}

/// A short extracted statement plus a back-reference to its source chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub fact: String,
    pub source_id: String,
}

/// Everything the store needs to persist one fact: the text, its embedding,
/// and enough source metadata to filter on at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactRecord {
    pub fact: String,
    pub embedding: Vec<f32>,
    pub source_file: String,
    pub chunk_index: usize,
    pub fact_index: usize,
    pub chunk_text: String,
    pub classes: Vec<String>,
}

impl FactRecord {
    /// Deterministic point id derived from the fact's position in the
    /// corpus. Re-running populate on an unchanged directory upserts the
    /// same ids, so the index never accumulates duplicates.
    pub fn point_id(&self) -> Uuid {
        let key = format!(
            "{}:{}:{}",
            self.source_file, self.chunk_index, self.fact_index
        );
        Uuid::from_bytes(md5::compute(key.as_bytes()).0)
    }
}

/// Filter applied to fact retrieval. Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactFilter {
    /// Labels the fact's class set must intersect
    pub classes: Vec<String>,
    /// Source files the fact must come from
    pub corpus: Vec<String>,
}

impl FactFilter {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.corpus.is_empty()
    }
}

/// A fact returned from a similarity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredFact {
    pub fact: String,
    pub source_file: String,
    pub chunk_index: usize,
    pub classes: Vec<String>,
    pub score: f32,
}

/// Trait for fact stores (e.g., Qdrant, or in-memory for tests)
///
/// Concurrency safety for parallel upserts is delegated to the backing
/// store; this interface takes no in-process locks of its own.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Verify the backing collection exists, creating it if necessary.
    /// Failure here is a configuration error and fatal at startup.
    async fn ensure_ready(&self) -> Result<()>;

    /// Upsert a batch of fact records, keyed by their deterministic ids
    async fn upsert(&self, records: Vec<FactRecord>) -> Result<()>;

    /// Nearest-neighbor search over stored facts, restricted by `filter`
    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        filter: &FactFilter,
    ) -> Result<Vec<ScoredFact>>;

    /// Total number of stored facts
    async fn count(&self) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_deterministic() {
        let record = FactRecord {
            fact: "the user prefers dark mode".to_string(),
            embedding: vec![0.0; 4],
            source_file: "alice".to_string(),
            chunk_index: 2,
            fact_index: 0,
            chunk_text: String::new(),
            classes: vec![],
        };

        let mut other = record.clone();
        other.fact = "different text, same position".to_string();

        // Identity comes from file + chunk + fact position, not the text
        assert_eq!(record.point_id(), other.point_id());

        other.fact_index = 1;
        assert_ne!(record.point_id(), other.point_id());
    }
}
