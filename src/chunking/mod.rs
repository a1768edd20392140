//! Text preparation for indexing.
//!
//! Source documents are cleaned, then split into fixed-size word windows that
//! become individually embedded chunks.

mod cleaner;
mod words;

pub use cleaner::clean_text;
pub use words::WordSplitter;

use serde::{Deserialize, Serialize};

/// A chunk of text taken from a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// File the chunk came from.
    pub source: String,
    /// Text content of this chunk.
    pub content: String,
    /// Order of this chunk within its source.
    pub order: i32,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(source: impl Into<String>, content: String, order: i32) -> Self {
        Self {
            source: source.into(),
            content,
            order,
        }
    }

    /// Number of whitespace-separated words in the chunk.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
