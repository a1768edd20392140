//! RAG (Retrieval-Augmented Generation) query workflow.
//!
//! A query is embedded, matched against the vector store, rendered into the
//! prompt template together with the matched chunks, and sent to the generator.

pub mod context;
mod pipeline;

pub use context::ContextBuilder;
pub use pipeline::{QueryPipeline, RagResponse};

use crate::vector_store::SearchResult;
use serde::Serialize;

/// A retrieved chunk as used in the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    /// Source file of the chunk.
    pub source: String,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source: result.document.source,
            content: result.document.content,
            score: result.score,
        }
    }
}
