//! In-memory fact store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use distill_core::{Error, FactFilter, FactRecord, FactStore, Result, ScoredFact};

/// In-memory fact store backed by a HashMap and cosine similarity.
///
/// Applies the same class/corpus filter semantics as the Qdrant store, so
/// tests and offline development exercise the real query path.
#[derive(Default)]
pub struct MemoryFactStore {
    records: Arc<RwLock<HashMap<Uuid, FactRecord>>>,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    fn matches(record: &FactRecord, filter: &FactFilter) -> bool {
        if !filter.classes.is_empty()
            && !record.classes.iter().any(|c| filter.classes.contains(c))
        {
            return false;
        }
        if !filter.corpus.is_empty() && !filter.corpus.contains(&record.source_file) {
            return false;
        }
        true
    }
}

#[async_trait]
impl FactStore for MemoryFactStore {
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert(&self, records: Vec<FactRecord>) -> Result<()> {
        let mut map = self
            .records
            .write()
            .map_err(|e| Error::VectorStore(format!("lock error: {e}")))?;
        for record in records {
            map.insert(record.point_id(), record);
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        filter: &FactFilter,
    ) -> Result<Vec<ScoredFact>> {
        let map = self
            .records
            .read()
            .map_err(|e| Error::VectorStore(format!("lock error: {e}")))?;

        let mut results: Vec<ScoredFact> = map
            .values()
            .filter(|record| Self::matches(record, filter))
            .map(|record| ScoredFact {
                fact: record.fact.clone(),
                source_file: record.source_file.clone(),
                chunk_index: record.chunk_index,
                classes: record.classes.clone(),
                score: Self::cosine_similarity(&embedding, &record.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        Ok(results)
    }

    async fn count(&self) -> Result<usize> {
        let map = self
            .records
            .read()
            .map_err(|e| Error::VectorStore(format!("lock error: {e}")))?;
        Ok(map.len())
    }
}
