//! Chat-completions generator.

use super::Generator;
use crate::config::GenerationSettings;
use crate::error::{RagChatError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Generator that sends the rendered prompt as a single user message.
pub struct ChatGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl ChatGenerator {
    /// Create a generator from settings.
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(
                &settings.api_base,
                Duration::from_secs(settings.timeout_seconds),
            )?,
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl Generator for ChatGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str, max_new_tokens: u32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| RagChatError::Generation(e.to_string()))?
                .into()];

        // The router forwards `max_tokens` to text-generation backends; the newer
        // `max_completion_tokens` field is not understood by all of them.
        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(max_new_tokens)
            .build()
            .map_err(|e| RagChatError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            RagChatError::Generation(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| RagChatError::Generation("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
