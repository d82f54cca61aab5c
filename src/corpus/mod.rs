//! Corpus ingestion: chapter text from a directory or a JSONL file.

use serde::{Deserialize, Serialize};

/// Chapter directory and JSONL loaders.
pub mod loader;

pub use loader::{chapter_number, open_chapters, ChapterDirectory, ChapterIter, JsonlCorpus};

/// One cleaned chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number.
    #[serde(rename = "chapter")]
    pub number: u32,
    /// Cleaned text.
    pub text: String,
}

impl Chapter {
    /// Create a chapter.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}
