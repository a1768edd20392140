//! Document indexing.
//!
//! Loads the source text files, cleans and splits them, embeds every chunk and
//! writes the chunks to the vector store in one batch. A store that already
//! holds documents is left untouched.

use crate::chunking::{clean_text, TextChunk, WordSplitter};
use crate::embedding::Embedder;
use crate::error::{RagChatError, Result};
use crate::vector_store::{Document, VectorStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Outcome of an indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    /// Source files read.
    pub files_loaded: usize,
    /// Chunks written by this run.
    pub chunks_indexed: usize,
    /// Documents in the store after the run.
    pub documents_in_store: usize,
    /// Whether the run was skipped because the store was already populated.
    pub skipped: bool,
}

/// Builds the vector store from a directory of text files.
pub struct Indexer {
    source_dir: PathBuf,
    splitter: WordSplitter,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Indexer {
    /// Create an indexer reading `*.txt` files from `source_dir`.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        split_length: usize,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            splitter: WordSplitter::new(split_length),
            embedder,
            vector_store,
        }
    }

    /// Index the source directory unless the store already has documents.
    #[instrument(skip(self), fields(source_dir = ?self.source_dir))]
    pub async fn run(&self) -> Result<IndexReport> {
        let existing = self.vector_store.document_count().await?;
        if existing > 0 {
            info!(
                "Vector store already holds {} documents, skipping indexing",
                existing
            );
            return Ok(IndexReport {
                files_loaded: 0,
                chunks_indexed: 0,
                documents_in_store: existing,
                skipped: true,
            });
        }

        let files = list_text_files(&self.source_dir)?;
        if files.is_empty() {
            return Err(RagChatError::InvalidInput(format!(
                "No .txt files found in {}",
                self.source_dir.display()
            )));
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        for path in &files {
            let raw = std::fs::read_to_string(path)?;
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let file_chunks = self.splitter.split(&source, &clean_text(&raw));
            info!("Split {} into {} chunks", source, file_chunks.len());
            chunks.extend(file_chunks);
        }

        if chunks.is_empty() {
            return Err(RagChatError::Indexing(
                "Source documents contain no text".to_string(),
            ));
        }

        // Embed everything before writing so a failed API call leaves the store empty.
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagChatError::Indexing(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(chunk.source, chunk.content, embedding, chunk.order)
            })
            .collect();

        let written = self.vector_store.upsert_batch(&documents).await?;
        let documents_in_store = self.vector_store.document_count().await?;
        info!("Indexed {} chunks from {} files", written, files.len());

        Ok(IndexReport {
            files_loaded: files.len(),
            chunks_indexed: written,
            documents_in_store,
            skipped: false,
        })
    }
}

/// `*.txt` files directly inside `dir`, sorted by path.
fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(RagChatError::InvalidInput(format!(
            "Source directory not found: {}",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}
