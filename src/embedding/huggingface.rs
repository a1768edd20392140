//! Hugging Face feature-extraction embeddings.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{RagChatError, Result};
use crate::openai::{api_token, http_client, DEFAULT_TIMEOUT_SECS};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Embedder backed by the hosted feature-extraction pipeline.
pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    dimensions: usize,
    batch_size: usize,
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

impl HuggingFaceEmbedder {
    /// Create an embedder from settings.
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        Self::with_timeout(settings, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create an embedder with a custom request timeout.
    pub fn with_timeout(settings: &EmbeddingSettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: Self::endpoint_for(&settings.api_base, &settings.model),
            token: api_token(),
            dimensions: settings.dimensions as usize,
            batch_size: settings.batch_size.max(1),
        })
    }

    /// Feature-extraction URL for a model.
    fn endpoint_for(api_base: &str, model: &str) -> String {
        format!(
            "{}/{}/pipeline/feature-extraction",
            api_base.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagChatError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            let mut request = self
                .client
                .post(&self.endpoint)
                .json(&FeatureExtractionRequest { inputs: chunk });
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RagChatError::Embedding(format!(
                    "Feature extraction returned {}: {}",
                    status, body
                )));
            }

            let embeddings: Vec<Vec<f32>> = response.json().await.map_err(|e| {
                RagChatError::Embedding(format!("Unexpected embedding payload: {}", e))
            })?;

            if embeddings.len() != chunk.len() {
                return Err(RagChatError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    chunk.len(),
                    embeddings.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = HuggingFaceEmbedder::new(&EmbeddingSettings::default()).unwrap();
        assert_eq!(embedder.dimensions(), 384);
        assert_eq!(
            embedder.endpoint,
            "https://router.huggingface.co/hf-inference/models/BAAI/bge-small-en-v1.5/pipeline/feature-extraction"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            HuggingFaceEmbedder::endpoint_for("http://localhost:8080/models/", "m"),
            "http://localhost:8080/models/m/pipeline/feature-extraction"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let settings = EmbeddingSettings {
            api_base: "http://127.0.0.1:9".to_string(),
            ..EmbeddingSettings::default()
        };
        let embedder = HuggingFaceEmbedder::new(&settings).unwrap();
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
