//! In-memory vector store.
//!
//! Holds chunks in insertion order behind a read-write lock. Used by tests and
//! by callers that do not need the index to outlive the process.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{RagChatError, Result};
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

/// Vector store kept entirely in process memory.
#[derive(Default)]
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(e: PoisonError<T>) -> RagChatError {
    RagChatError::VectorStore(format!("Lock poisoned: {}", e))
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut stored = self.documents.write().map_err(poisoned)?;
        for doc in docs {
            match stored.iter_mut().find(|existing| existing.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => stored.push(doc.clone()),
            }
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let stored = self.documents.read().map_err(poisoned)?;
        Ok(rank(stored.iter().cloned(), query_embedding, limit, min_score))
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.documents.read().map_err(poisoned)?.len())
    }
}
