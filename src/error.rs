//! Error types for ragchat.

use thiserror::Error;

/// Library-level error type for ragchat operations.
#[derive(Error, Debug)]
pub enum RagChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Indexing failed: {0}")]
    Indexing(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RagChatError {
    /// Whether this error came from one of the hosted inference APIs.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RagChatError::Embedding(_) | RagChatError::Generation(_) | RagChatError::Http(_)
        )
    }
}

/// Result type alias for ragchat operations.
pub type Result<T> = std::result::Result<T, RagChatError>;
