//! SQLite-based vector store implementation.
//!
//! Embeddings are stored as little-endian `f32` blobs and scored in Rust with a
//! full scan, which is adequate for a single-document-set chatbot.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{RagChatError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        content TEXT NOT NULL,
        embedding BLOB NOT NULL,
        chunk_order INTEGER NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_documents_source ON documents(source);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a vector store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RagChatError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn load_all(conn: &Connection) -> Result<Vec<Document>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, source, content, embedding, chunk_order, indexed_at
            FROM documents
            "#,
        )?;

        let docs = stmt.query_map([], |row| {
            let id_str: String = row.get(0)?;
            let embedding_bytes: Vec<u8> = row.get(3)?;
            let indexed_at_str: String = row.get(5)?;

            Ok(Document {
                id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
                source: row.get(1)?,
                content: row.get(2)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
                chunk_order: row.get(4)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(docs.filter_map(|doc| doc.ok()).collect())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, docs), fields(count = docs.len()))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for doc in docs {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO documents
                (id, source, content, embedding, chunk_order, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    doc.id.to_string(),
                    doc.source,
                    doc.content,
                    Self::embedding_to_bytes(&doc.embedding),
                    doc.chunk_order,
                    doc.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    #[instrument(skip(self, query_embedding))]
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = {
            let conn = self.lock()?;
            Self::load_all(&conn)?
        };

        let results = rank(docs, query_embedding, limit, min_score);
        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let docs = vec![
            Document::new(
                "autism.txt".to_string(),
                "Autism is a neurodevelopmental condition".to_string(),
                vec![1.0, 0.0, 0.0],
                0,
            ),
            Document::new(
                "autism.txt".to_string(),
                "Early intervention helps".to_string(),
                vec![0.0, 1.0, 0.0],
                1,
            ),
        ];

        assert_eq!(store.upsert_batch(&docs).await.unwrap(), 2);
        assert_eq!(store.document_count().await.unwrap(), 2);

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].document.source, "autism.txt");
        assert_eq!(results[0].document.embedding, vec![1.0, 0.0, 0.0]);

        let filtered = store
            .search_with_threshold(&[1.0, 0.0, 0.0], 10, 0.5)
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store").join("vectors.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            let doc = Document::new("a.txt".into(), "chunk".into(), vec![0.5, 0.5], 0);
            store.upsert_batch(&[doc]).await.unwrap();
        }

        let reopened = SqliteVectorStore::new(&path).unwrap();
        assert_eq!(reopened.document_count().await.unwrap(), 1);
    }

    #[test]
    fn test_embedding_bytes_round_trip() {
        let embedding = vec![0.25f32, -1.5, 3.0];
        let bytes = SqliteVectorStore::embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(SqliteVectorStore::bytes_to_embedding(&bytes), embedding);
    }
}
