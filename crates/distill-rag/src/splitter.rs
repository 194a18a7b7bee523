//! Transcript splitter implementations

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use distill_core::{Chunk, Error, Result, Splitter};

fn speaker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Jane Doe: we mostly use the export feature"
    RE.get_or_init(|| Regex::new(r"^([A-Za-z][A-Za-z0-9 .'\-]{0,40}):\s+(.*)$").unwrap())
}

/// Splits a transcript into speaker turns.
///
/// Consecutive lines attributed to the same speaker are merged into one
/// chunk. Unattributed lines continue the current turn. Turns from excluded
/// speakers (typically the interviewer) are dropped, but their positions
/// still advance the chunk index so ordering survives.
pub struct TurnSplitter {
    exclude: Vec<String>,
}

impl TurnSplitter {
    pub fn new() -> Self {
        Self {
            exclude: Vec::new(),
        }
    }

    pub fn excluding<I, S>(speakers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: speakers.into_iter().map(|s| s.into().to_lowercase()).collect(),
        }
    }

    fn is_excluded(&self, speaker: &str) -> bool {
        self.exclude.iter().any(|s| s == &speaker.to_lowercase())
    }
}

impl Default for TurnSplitter {
    fn default() -> Self {
        Self::new()
    }
}

struct Turn {
    speaker: Option<String>,
    lines: Vec<String>,
}

impl Splitter for TurnSplitter {
    fn name(&self) -> &str {
        "turns"
    }

    fn split(&self, path: &Path) -> Result<Vec<Chunk>> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Splitter(format!("{}: {}", path.display(), e)))?;

        let mut turns: Vec<Turn> = Vec::new();

        for line in content.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = speaker_re().captures(line) {
                let speaker = caps[1].trim().to_string();
                let text = caps[2].to_string();
                match turns.last_mut() {
                    Some(turn) if turn.speaker.as_deref() == Some(speaker.as_str()) => {
                        turn.lines.push(text);
                    }
                    _ => turns.push(Turn {
                        speaker: Some(speaker),
                        lines: vec![text],
                    }),
                }
            } else {
                match turns.last_mut() {
                    Some(turn) => turn.lines.push(line.trim().to_string()),
                    None => turns.push(Turn {
                        speaker: None,
                        lines: vec![line.trim().to_string()],
                    }),
                }
            }
        }

        if turns.is_empty() {
            return Err(Error::Splitter(format!(
                "{}: no usable content",
                path.display()
            )));
        }

        let chunks = turns
            .into_iter()
            .enumerate()
            .filter(|(_, turn)| match &turn.speaker {
                Some(speaker) => !self.is_excluded(speaker),
                None => true,
            })
            .map(|(index, turn)| {
                let mut chunk = Chunk::new(turn.lines.join("\n"), index);
                if let Some(speaker) = turn.speaker {
                    chunk = chunk.with_speaker(speaker);
                }
                chunk
            })
            .collect();

        Ok(chunks)
    }
}

/// Splits a transcript on blank-line paragraph boundaries, merging
/// paragraphs below `min_size` into their successor.
pub struct ParagraphSplitter {
    pub min_size: usize,
}

impl ParagraphSplitter {
    pub fn new(min_size: usize) -> Self {
        Self { min_size }
    }
}

impl Default for ParagraphSplitter {
    fn default() -> Self {
        Self { min_size: 200 }
    }
}

impl Splitter for ParagraphSplitter {
    fn name(&self) -> &str {
        "paragraphs"
    }

    fn split(&self, path: &Path) -> Result<Vec<Chunk>> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Splitter(format!("{}: {}", path.display(), e)))?;

        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for block in content.split("\n\n") {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            if buffer.is_empty() {
                buffer.push_str(block);
            } else {
                buffer.push_str("\n\n");
                buffer.push_str(block);
            }

            if buffer.len() >= self.min_size {
                chunks.push(Chunk::new(buffer.clone(), chunks.len()));
                buffer.clear();
            }
        }

        // flush the trailing buffer
        if !buffer.is_empty() {
            chunks.push(Chunk::new(buffer, chunks.len()));
        }

        if chunks.is_empty() {
            return Err(Error::Splitter(format!(
                "{}: no usable content",
                path.display()
            )));
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn transcript(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_turns_grouped_by_speaker() {
        let file = transcript(
            "Alice: I use the dashboard every day.\n\
             Alice: Mostly for exports.\n\
             Bob: How often do exports fail?\n\
             Alice: Maybe once a week.\n",
        );

        let chunks = TurnSplitter::new().split(file.path()).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].speaker.as_deref(), Some("Alice"));
        assert!(chunks[0].text.contains("every day"));
        assert!(chunks[0].text.contains("exports"));
        assert_eq!(chunks[1].speaker.as_deref(), Some("Bob"));
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn test_excluded_speaker_dropped_but_order_kept() {
        let file = transcript(
            "Bob: How often do exports fail?\n\
             Alice: Maybe once a week.\n",
        );

        let chunks = TurnSplitter::excluding(["bob"]).split(file.path()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].speaker.as_deref(), Some("Alice"));
        // Index reflects the original position, not the filtered one
        assert_eq!(chunks[0].index, 1);
    }

    #[test]
    fn test_unattributed_lines_continue_turn() {
        let file = transcript(
            "Alice: The import flow is slow.\n\
             Really slow on Mondays.\n",
        );

        let chunks = TurnSplitter::new().split(file.path()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("Mondays"));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = transcript("\n\n   \n");
        assert!(TurnSplitter::new().split(file.path()).is_err());
        assert!(ParagraphSplitter::default().split(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = TurnSplitter::new()
            .split(Path::new("/nonexistent/interview.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("interview.txt"));
    }

    #[test]
    fn test_paragraphs_merge_below_min_size() {
        let file = transcript("Short one.\n\nShort two.\n\nThis third paragraph is long enough.");

        let chunks = ParagraphSplitter::new(30).split(file.path()).unwrap();
        assert!(chunks.len() < 3);
        let all: String = chunks.iter().map(|c| c.text.clone()).collect();
        assert!(all.contains("Short one"));
        assert!(all.contains("long enough"));
    }

    #[test]
    fn test_paragraph_indexes_sequential() {
        let file = transcript("First paragraph.\n\nSecond paragraph.\n\nThird paragraph.");

        let chunks = ParagraphSplitter::new(0).split(file.path()).unwrap();
        let indexes: Vec<_> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }
}
