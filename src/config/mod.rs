//! Configuration module for ragchat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChatLogSettings, EmbeddingSettings, EvaluationSettings, GeneralSettings, GenerationSettings,
    IndexingSettings, PromptSettings, RetrievalSettings, ServerSettings, Settings,
    VectorStoreSettings,
};
