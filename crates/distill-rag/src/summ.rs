//! Query path: embed, retrieve, synthesize

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use distill_core::{EmbeddingProvider, FactFilter, FactStore, LlmProvider, Result, ScoredFact};

const ANSWER_TEMPLATE: &str = "\
You are answering a question about a corpus of interview transcripts.
Use only the facts listed below. If the facts are not sufficient to answer, \
say so plainly instead of guessing.

Facts:
{facts}

Question: {query}

Answer:";

/// Answer returned from a query. `retrieved` is populated only when the
/// caller asked for debug output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub retrieved: Vec<ScoredFact>,
}

/// Owns the fact-store handle and the query-time path.
pub struct Summ {
    store: Arc<dyn FactStore>,
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    /// Number of facts to retrieve per query; mutable between queries.
    pub n: usize,
}

impl Summ {
    pub const DEFAULT_N: usize = 3;

    pub fn new(
        store: Arc<dyn FactStore>,
        llm: Arc<dyn LlmProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            store,
            llm,
            embedder,
            n: Self::DEFAULT_N,
        }
    }

    fn build_context(facts: &[ScoredFact]) -> String {
        facts
            .iter()
            .enumerate()
            .map(|(i, fact)| format!("{}. [{}] {}", i + 1, fact.source_file, fact.fact))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn build_prompt(query: &str, facts: &[ScoredFact]) -> String {
        ANSWER_TEMPLATE
            .replace("{facts}", &Self::build_context(facts))
            .replace("{query}", query.trim())
    }

    /// Answer `text` from the corpus.
    ///
    /// Retrieval is restricted to facts whose labels intersect `classes`
    /// and whose source is in `corpus`, when either is non-empty.
    pub async fn query(
        &self,
        text: &str,
        classes: &[String],
        corpus: &[String],
        debug: bool,
    ) -> Result<QueryResponse> {
        let embedding = self.embedder.embed(text).await?;

        let filter = FactFilter {
            classes: classes.to_vec(),
            corpus: corpus.to_vec(),
        };
        let retrieved = self.store.search(embedding, self.n, &filter).await?;

        if retrieved.is_empty() {
            return Ok(QueryResponse {
                answer: "No relevant facts were found for that question.".to_string(),
                retrieved: Vec::new(),
            });
        }

        let answer = self.llm.generate(&Self::build_prompt(text, &retrieved)).await?;

        Ok(QueryResponse {
            answer,
            retrieved: if debug { retrieved } else { Vec::new() },
        })
    }
}
