//! HTTP client configuration for the hosted inference APIs.
//!
//! Generation talks to an OpenAI-compatible endpoint (the Hugging Face router by
//! default), so it goes through `async-openai` with a custom base URL. Embeddings
//! use the plain feature-extraction endpoint through `reqwest`.

use crate::error::{RagChatError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for hosted API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variables checked, in order, for the API token.
pub const TOKEN_VARS: [&str; 2] = ["HF_API_TOKEN", "HF_TOKEN"];

/// Read the hosted API token from the environment.
pub fn api_token() -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.is_empty())
}

/// Build a `reqwest` client with the given timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(RagChatError::Http)
}

/// Create a chat completions client pointed at `api_base`.
pub fn create_client(api_base: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new().with_api_base(api_base);
    if let Some(token) = api_token() {
        config = config.with_api_key(token);
    }

    Ok(Client::with_config(config).with_http_client(http_client(timeout)?))
}
