//! Qdrant-backed fact store

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, Filter, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use std::collections::HashMap;

use distill_core::{Error, FactFilter, FactRecord, FactStore, Result, ScoredFact};

/// Fact store backed by a named Qdrant collection.
///
/// Point ids come from `FactRecord::point_id`, so concurrent or repeated
/// upserts for the same fact position overwrite rather than duplicate.
pub struct QdrantFactStore {
    client: Qdrant,
    collection: String,
    dimension: u64,
}

impl QdrantFactStore {
    pub fn new(url: &str, collection: impl Into<String>, dimension: u64) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(Self {
            client,
            collection: collection.into(),
            dimension,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn payload_for(record: &FactRecord) -> Result<Payload> {
        Payload::try_from(json!({
            "fact": record.fact,
            "source": record.source_file,
            "chunk_index": record.chunk_index as i64,
            "chunk": record.chunk_text,
            "classes": record.classes,
        }))
        .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn filter_for(filter: &FactFilter) -> Option<Filter> {
        if filter.is_empty() {
            return None;
        }

        let mut conditions = Vec::new();
        if !filter.classes.is_empty() {
            // keyword match on a list payload field hits when any element
            // equals any requested label
            conditions.push(Condition::matches("classes", filter.classes.clone()));
        }
        if !filter.corpus.is_empty() {
            conditions.push(Condition::matches("source", filter.corpus.clone()));
        }

        Some(Filter::must(conditions))
    }

    fn payload_str(payload: &HashMap<String, Value>, key: &str) -> String {
        match payload.get(key) {
            Some(Value {
                kind: Some(Kind::StringValue(s)),
            }) => s.clone(),
            _ => String::new(),
        }
    }

    fn payload_usize(payload: &HashMap<String, Value>, key: &str) -> usize {
        match payload.get(key) {
            Some(Value {
                kind: Some(Kind::IntegerValue(i)),
            }) => *i as usize,
            _ => 0,
        }
    }

    fn payload_list(payload: &HashMap<String, Value>, key: &str) -> Vec<String> {
        match payload.get(key) {
            Some(Value {
                kind: Some(Kind::ListValue(list)),
            }) => list
                .values
                .iter()
                .filter_map(|v| match &v.kind {
                    Some(Kind::StringValue(s)) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl FactStore for QdrantFactStore {
    async fn ensure_ready(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(self.collection.as_str())
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(self.collection.as_str())
                        .vectors_config(VectorParamsBuilder::new(self.dimension, Distance::Cosine)),
                )
                .await
                .map_err(|e| Error::VectorStore(e.to_string()))?;
        }

        Ok(())
    }

    async fn upsert(&self, records: Vec<FactRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(records.len());
        for record in &records {
            points.push(PointStruct::new(
                record.point_id().to_string(),
                record.embedding.clone(),
                Self::payload_for(record)?,
            ));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.as_str(), points).wait(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: usize,
        filter: &FactFilter,
    ) -> Result<Vec<ScoredFact>> {
        let mut request =
            SearchPointsBuilder::new(self.collection.as_str(), embedding, limit as u64).with_payload(true);

        if let Some(conditions) = Self::filter_for(filter) {
            request = request.filter(conditions);
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let facts = response
            .result
            .into_iter()
            .map(|point| ScoredFact {
                fact: Self::payload_str(&point.payload, "fact"),
                source_file: Self::payload_str(&point.payload, "source"),
                chunk_index: Self::payload_usize(&point.payload, "chunk_index"),
                classes: Self::payload_list(&point.payload, "classes"),
                score: point.score,
            })
            .collect();

        Ok(facts)
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(self.collection.as_str()).exact(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }
}
