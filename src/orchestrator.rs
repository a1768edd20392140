//! Service wiring for ragchat.
//!
//! Builds the embedder, generator, vector store and chat log from settings
//! once, and hands out the indexer and query pipeline built on them.

use crate::chat_log::ChatLog;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, HuggingFaceEmbedder};
use crate::error::Result;
use crate::generation::{ChatGenerator, Generator};
use crate::indexing::{IndexReport, Indexer};
use crate::rag::QueryPipeline;
use crate::vector_store::{SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::info;

/// Owns the long-lived components of the chatbot.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    vector_store: Arc<dyn VectorStore>,
    chat_log: ChatLog,
}

impl Orchestrator {
    /// Create an orchestrator backed by the hosted APIs and on-disk stores.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let embedder = Arc::new(HuggingFaceEmbedder::new(&settings.embedding)?);
        let generator = Arc::new(ChatGenerator::new(&settings.generation)?);
        info!(
            "Using embedding model {} and generation model {}",
            settings.embedding.model,
            generator.model()
        );

        let vector_store = Arc::new(SqliteVectorStore::new(&settings.vector_store_path())?);
        let chat_log = ChatLog::open(&settings.chat_log_path())?;

        Ok(Self {
            settings,
            prompts,
            embedder,
            generator,
            vector_store,
            chat_log,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        vector_store: Arc<dyn VectorStore>,
        chat_log: ChatLog,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            generator,
            vector_store,
            chat_log,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }

    /// The indexer for the configured source directory.
    pub fn indexer(&self) -> Indexer {
        Indexer::new(
            self.settings.source_dir(),
            self.settings.indexing.split_length,
            Arc::clone(&self.embedder),
            Arc::clone(&self.vector_store),
        )
    }

    /// Index the source directory unless the store is already populated.
    pub async fn index(&self) -> Result<IndexReport> {
        self.indexer().run().await
    }

    /// A query pipeline over the shared components.
    pub fn pipeline(&self) -> QueryPipeline {
        QueryPipeline::from_settings(
            &self.settings,
            &self.prompts,
            Arc::clone(&self.vector_store),
            Arc::clone(&self.embedder),
            Arc::clone(&self.generator),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{KeywordEmbedder, RecordingGenerator};
    use crate::vector_store::MemoryVectorStore;

    #[tokio::test]
    async fn test_index_then_ask() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("data");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::write(
            source_dir.join("autism.txt"),
            "Autism is a neurodevelopmental condition.",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.indexing.source_dir = source_dir.to_string_lossy().into_owned();

        let orchestrator = Orchestrator::with_components(
            settings,
            Prompts::default(),
            Arc::new(KeywordEmbedder::new()),
            Arc::new(RecordingGenerator::new()),
            Arc::new(MemoryVectorStore::new()),
            ChatLog::open(&dir.path().join("rag_chat.db")).unwrap(),
        );

        let report = orchestrator.index().await.unwrap();
        assert_eq!(report.chunks_indexed, 1);
        assert!(orchestrator.index().await.unwrap().skipped);

        let response = orchestrator.pipeline().run("What is autism?").await.unwrap();
        assert_eq!(response.answer, "Autism is a neurodevelopmental condition.");
    }
}
