//! The query pipeline: retrieve, render, generate.

use super::{context::format_context_for_prompt, ContextBuilder, ContextChunk};
use crate::config::{Prompts, Settings};
use crate::embedding::Embedder;
use crate::error::{RagChatError, Result};
use crate::generation::Generator;
use crate::vector_store::VectorStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The query pipeline.
///
/// Built once at startup and never mutated afterwards. Every collaborator is
/// `Send + Sync`, so a single instance can serve concurrent requests behind an `Arc`.
pub struct QueryPipeline {
    context_builder: ContextBuilder,
    generator: Arc<dyn Generator>,
    template: String,
    max_new_tokens: u32,
}

impl QueryPipeline {
    /// Create a pipeline with default retrieval and prompt settings.
    pub fn new(
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            context_builder: ContextBuilder::new(vector_store, embedder),
            generator,
            template: Prompts::default().rag.template,
            max_new_tokens: 350,
        }
    }

    /// Create a pipeline configured from settings and prompts.
    pub fn from_settings(
        settings: &Settings,
        prompts: &Prompts,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self::new(vector_store, embedder, generator)
            .with_top_k(settings.retrieval.top_k)
            .with_min_score(settings.retrieval.min_score)
            .with_template(prompts.rag.template.clone())
            .with_max_new_tokens(settings.generation.max_new_tokens)
    }

    /// Set the maximum number of retrieved chunks.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.context_builder = self.context_builder.with_max_chunks(top_k);
        self
    }

    /// Set the minimum retrieval similarity.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.context_builder = self.context_builder.with_min_score(min_score);
        self
    }

    /// Set the prompt template.
    pub fn with_template(mut self, template: String) -> Self {
        self.template = template;
        self
    }

    /// Set the generation token budget.
    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// The embedder shared by retrieval and evaluation.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        Arc::clone(self.context_builder.embedder())
    }

    /// Render the prompt for a query and its retrieved context.
    pub fn render_prompt(&self, query: &str, chunks: &[ContextChunk]) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context_for_prompt(chunks));
        vars.insert("query".to_string(), query.to_string());
        Prompts::render(&self.template, &vars)
    }

    /// Answer a query from the indexed documents.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn run(&self, query: &str) -> Result<RagResponse> {
        if query.trim().is_empty() {
            return Err(RagChatError::InvalidInput("query must not be empty".to_string()));
        }

        info!("Processing query");

        let context_chunks = self.context_builder.build(query).await?;
        debug!("Retrieved {} context chunks", context_chunks.len());

        let prompt = self.render_prompt(query, &context_chunks);
        let answer = self.generator.generate(&prompt, self.max_new_tokens).await?;

        Ok(RagResponse {
            answer,
            sources: context_chunks,
        })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks the answer was conditioned on.
    pub sources: Vec<ContextChunk>,
}
