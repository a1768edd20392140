//! Context building for RAG responses.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;

/// Builds context from search results for RAG.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            max_chunks: 10,
            min_score: 0.0,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// The embedder used for queries.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Build context for a query.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, self.max_chunks, self.min_score)
            .await?;

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Format context chunks for the prompt's context block.
///
/// An empty slice yields an empty string, leaving the block blank.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
