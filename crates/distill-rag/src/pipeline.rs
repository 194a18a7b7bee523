//! Ingestion pipeline: split, factify, classify, embed, upsert

use colored::*;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use distill_core::{
    ClassifierRegistry, EmbeddingProvider, Error, FactRecord, FactStore, Result, Splitter,
};

use crate::factify::Factifier;

/// Bound on concurrent per-file work when populate runs in parallel.
const MAX_CONCURRENT_FILES: usize = 4;

/// Outcome of a populate run. A single file's failure never aborts the run;
/// it lands here instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulateReport {
    pub files_ok: usize,
    pub facts_indexed: usize,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Orchestrates ingestion of a transcript directory into the fact store.
pub struct Pipeline {
    dir: PathBuf,
    splitter: Arc<dyn Splitter>,
    factifier: Factifier,
    registry: Arc<ClassifierRegistry>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn FactStore>,
    verbose: bool,
}

impl Pipeline {
    pub fn new(
        dir: impl Into<PathBuf>,
        splitter: Arc<dyn Splitter>,
        factifier: Factifier,
        registry: Arc<ClassifierRegistry>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn FactStore>,
    ) -> Self {
        Self {
            dir: dir.into(),
            splitter,
            factifier,
            registry,
            embedder,
            store,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }

    fn transcript_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {}", self.dir.display(), e))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                !Self::file_stem(path).starts_with('.')
            })
            .collect();
        files.sort();

        Ok(files)
    }

    /// The set of distinct source file stems currently present in the input
    /// directory. Recomputed on every call, never persisted.
    pub fn corpus(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .transcript_files()?
            .iter()
            .map(|path| Self::file_stem(path))
            .collect())
    }

    async fn process_file(&self, path: &Path) -> Result<usize> {
        let source_file = Self::file_stem(path);
        let chunks = self.splitter.split(path)?;

        let mut indexed = 0;
        for chunk in &chunks {
            let facts = self.factifier.factify(chunk).await?;
            if facts.is_empty() {
                continue;
            }

            let classes = self.registry.classify_all(&chunk.text).await?;
            let embeddings = self.embedder.embed_batch(&facts).await?;

            let records: Vec<FactRecord> = facts
                .into_iter()
                .zip(embeddings)
                .enumerate()
                .map(|(fact_index, (fact, embedding))| FactRecord {
                    fact,
                    embedding,
                    source_file: source_file.clone(),
                    chunk_index: chunk.index,
                    fact_index,
                    chunk_text: chunk.text.clone(),
                    classes: classes.clone(),
                })
                .collect();

            indexed += records.len();
            self.store.upsert(records).await?;
        }

        if self.verbose {
            println!(
                "  {} {} ({} chunks, {} facts)",
                "✓".green(),
                source_file,
                chunks.len(),
                indexed
            );
        }

        Ok(indexed)
    }

    /// Ingest every transcript under the configured directory.
    ///
    /// With `parallel`, per-file work fans out over a bounded pool and
    /// completion order across files is not guaranteed. Each outcome is
    /// recorded as its file finishes, and failures are warned on stderr at
    /// that point, so an interrupted run has already reported every file
    /// that failed before the interrupt.
    pub async fn populate(&self, parallel: bool) -> Result<PopulateReport> {
        let files = self.transcript_files()?;
        let mut report = PopulateReport::default();

        if parallel {
            let mut outcomes = stream::iter(files)
                .map(|path| async move {
                    let name = Self::file_stem(&path);
                    let outcome = self.process_file(&path).await;
                    (name, outcome)
                })
                .buffer_unordered(MAX_CONCURRENT_FILES);

            while let Some((file, outcome)) = outcomes.next().await {
                Self::record_outcome(&mut report, file, outcome);
            }
        } else {
            for path in files {
                let name = Self::file_stem(&path);
                let outcome = self.process_file(&path).await;
                Self::record_outcome(&mut report, name, outcome);
            }
        }

        Ok(report)
    }

    fn record_outcome(report: &mut PopulateReport, file: String, outcome: Result<usize>) {
        match outcome {
            Ok(indexed) => {
                report.files_ok += 1;
                report.facts_indexed += indexed;
            }
            Err(e) => {
                eprintln!("{} skipping {}: {}", "⚠️".yellow(), file, e);
                report.failures.push(FileFailure {
                    file,
                    error: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryFactStore;
    use crate::splitter::TurnSplitter;
    use crate::testutil::{FailingProvider, HashEmbedder, StaticProvider};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_transcript(dir: &Path, name: &str, content: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content).unwrap();
    }

    fn pipeline(dir: &Path, store: Arc<MemoryFactStore>) -> Pipeline {
        let provider = Arc::new(StaticProvider::new("- a fact about the product"));
        Pipeline::new(
            dir,
            Arc::new(TurnSplitter::new()),
            Factifier::new(provider),
            Arc::new(ClassifierRegistry::new()),
            Arc::new(HashEmbedder::new(16)),
            store,
        )
    }

    #[tokio::test]
    async fn test_populate_skips_bad_file_and_reports_it() {
        let dir = TempDir::new().unwrap();
        write_transcript(dir.path(), "alice.txt", b"Alice: the export flow works.\n");
        write_transcript(dir.path(), "bob.txt", b"Bob: imports are slow.\n");
        // invalid UTF-8, unreadable as a transcript
        write_transcript(dir.path(), "broken.txt", &[0xff, 0xfe, 0x00, 0x9f]);

        let store = Arc::new(MemoryFactStore::new());
        let report = pipeline(dir.path(), store.clone()).populate(false).await.unwrap();

        assert_eq!(report.files_ok, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "broken");
        assert!(store.count().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_populate_parallel_processes_all_files() {
        let dir = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"] {
            write_transcript(
                dir.path(),
                name,
                b"Speaker: something interesting happened.\n",
            );
        }

        let store = Arc::new(MemoryFactStore::new());
        let report = pipeline(dir.path(), store.clone()).populate(true).await.unwrap();

        assert_eq!(report.files_ok, 5);
        assert!(report.failures.is_empty());
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_populate_twice_does_not_duplicate() {
        let dir = TempDir::new().unwrap();
        write_transcript(dir.path(), "alice.txt", b"Alice: the export flow works.\n");

        let store = Arc::new(MemoryFactStore::new());
        let pipe = pipeline(dir.path(), store.clone());

        pipe.populate(false).await.unwrap();
        let count_first = store.count().await.unwrap();
        pipe.populate(false).await.unwrap();

        assert_eq!(store.count().await.unwrap(), count_first);
    }

    #[tokio::test]
    async fn test_corpus_lists_file_stems() {
        let dir = TempDir::new().unwrap();
        write_transcript(dir.path(), "alice.txt", b"Alice: hello.\n");
        write_transcript(dir.path(), "bob.txt", b"Bob: hello.\n");

        let store = Arc::new(MemoryFactStore::new());
        let corpus = pipeline(dir.path(), store).corpus().unwrap();

        let names: Vec<_> = corpus.into_iter().collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_provider_failure_reported_per_file() {
        let dir = TempDir::new().unwrap();
        write_transcript(dir.path(), "alice.txt", b"Alice: the export flow works.\n");

        let store = Arc::new(MemoryFactStore::new());
        let pipe = Pipeline::new(
            dir.path(),
            Arc::new(TurnSplitter::new()),
            Factifier::new(Arc::new(FailingProvider)),
            Arc::new(ClassifierRegistry::new()),
            Arc::new(HashEmbedder::new(16)),
            store.clone(),
        );

        let report = pipe.populate(false).await.unwrap();
        assert_eq!(report.files_ok, 0);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("provider unavailable"));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_fatal() {
        let store = Arc::new(MemoryFactStore::new());
        let pipe = pipeline(Path::new("/nonexistent/interviews"), store);

        assert!(pipe.populate(false).await.is_err());
    }
}
