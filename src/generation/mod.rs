//! Text generation through a hosted LLM.

mod chat;

pub use chat::ChatGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for prompt-in, text-out generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply for `prompt`, producing at most `max_new_tokens` tokens.
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String>;

    /// Name of the model behind this generator.
    fn model(&self) -> &str;
}
