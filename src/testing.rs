//! Deterministic in-process doubles for the hosted APIs.

use crate::embedding::Embedder;
use crate::error::{RagChatError, Result};
use crate::generation::Generator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lowercase word hashes into one dimension.
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// An embedder whose every call fails like an unreachable API.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = word
                .to_lowercase()
                .bytes()
                .fold(0xcbf29ce484222325u64, |h, b| {
                    (h ^ b as u64).wrapping_mul(0x100000001b3)
                });
            vector[(hash % DIMENSIONS as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RagChatError::Embedding("service unavailable".to_string()));
        }
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Generator that records prompts and answers from the prompt's context block.
pub struct RecordingGenerator {
    prompts: Mutex<Vec<(String, u32)>>,
    reply: Option<String>,
    fail: bool,
}

impl RecordingGenerator {
    /// Replies with the first line of the prompt's context block, or "Answer not found".
    pub fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: None,
            fail: false,
        }
    }

    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn prompts(&self) -> Vec<(String, u32)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_new_tokens));

        if self.fail {
            return Err(RagChatError::Generation("model is overloaded".to_string()));
        }
        if let Some(reply) = &self.reply {
            return Ok(reply.clone());
        }

        let context_line = prompt
            .split("Context:\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .filter(|line| !line.trim().is_empty() && !line.starts_with("query:"));

        Ok(context_line
            .map(str::to_string)
            .unwrap_or_else(|| "Answer not found".to_string()))
    }

    fn model(&self) -> &str {
        "recording"
    }
}
