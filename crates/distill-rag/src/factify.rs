//! Fact extraction from transcript chunks

use regex::Regex;
use std::sync::Arc;

use distill_core::{Chunk, LlmProvider, Result};

const PROMPT_TEMPLATE: &str = "\
Your task is to take a paragraph from an interview transcript, and extract \
any pertinent facts from it.
The facts should be formatted in a bulleted list, one fact per line.

Paragraph:
{chunk}

Facts:
-";

/// Extracts discrete facts from a chunk via a single LLM call.
pub struct Factifier {
    provider: Arc<dyn LlmProvider>,
    bullet: Regex,
}

impl Factifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            bullet: Regex::new(r"^\s*-\s*(?<fact>.*)$").unwrap(),
        }
    }

    fn build_prompt(&self, chunk: &Chunk) -> String {
        PROMPT_TEMPLATE.replace("{chunk}", chunk.text.trim())
    }

    /// Parse a raw model response into fact strings.
    ///
    /// Each line with a leading bullet marker becomes exactly one fact;
    /// continuation lines without a marker are dropped, so a bullet never
    /// spans multiple lines. Empty captures are dropped too, which makes a
    /// blank response parse to an empty list rather than an error.
    pub fn parse(&self, raw: &str) -> Vec<String> {
        raw.lines()
            .filter_map(|line| self.bullet.captures(line))
            .map(|caps| caps["fact"].trim().to_string())
            .filter(|fact| !fact.is_empty())
            .collect()
    }

    /// Extract facts from one chunk
    pub async fn factify(&self, chunk: &Chunk) -> Result<Vec<String>> {
        let prompt = self.build_prompt(chunk);
        let response = self.provider.generate(&prompt).await?;
        Ok(self.parse(&response))
    }
}
