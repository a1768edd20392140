//! Vector store abstraction for ragchat.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document chunk stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Source file this chunk was taken from.
    pub source: String,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Order of this chunk in its source.
    pub chunk_order: i32,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document.
    pub fn new(source: String, content: String, embedding: Vec<f32>, chunk_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            content,
            embedding,
            chunk_order,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a batch of documents atomically. Returns the number written.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for the most similar documents.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score, filter, sort and truncate candidate documents.
pub(crate) fn rank<I>(
    docs: I,
    query_embedding: &[f32],
    limit: usize,
    min_score: f32,
) -> Vec<SearchResult>
where
    I: IntoIterator<Item = Document>,
{
    let mut results: Vec<SearchResult> = docs
        .into_iter()
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .filter(|r| r.score >= min_score)
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.chunk_order.cmp(&b.document.chunk_order))
    });
    results.truncate(limit);
    results
}
