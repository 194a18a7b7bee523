//! Splitter trait and chunk types

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// A contiguous span of transcript text treated as one unit of input to
/// fact extraction. The ordinal index preserves turn ordering within the
/// source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub speaker: Option<String>,
}

impl Chunk {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
            speaker: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// Trait for transcript splitters
///
/// Implementations divide a raw transcript file into ordered chunks. An
/// unreadable or malformed file returns an error, which the pipeline treats
/// as "skip this file" rather than aborting the run.
pub trait Splitter: Send + Sync {
    /// Name of this splitting strategy
    fn name(&self) -> &str;

    /// Split the file at `path` into ordered chunks
    fn split(&self, path: &Path) -> Result<Vec<Chunk>>;
}
