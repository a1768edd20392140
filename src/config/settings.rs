//! Configuration settings for ragchat.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub indexing: IndexingSettings,
    pub vector_store: VectorStoreSettings,
    pub retrieval: RetrievalSettings,
    pub chat_log: ChatLogSettings,
    pub evaluation: EvaluationSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.ragchat".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Hosted embedding API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of the feature-extraction API; the model id is appended.
    pub api_base: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions produced by the model.
    pub dimensions: u32,
    /// Texts sent per request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: "https://router.huggingface.co/hf-inference/models".to_string(),
            model: "BAAI/bge-small-en-v1.5".to_string(),
            dimensions: 384,
            batch_size: 32,
        }
    }
}

/// Hosted text generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Base URL of the OpenAI-compatible chat completions API.
    pub api_base: String,
    /// LLM model for response generation.
    pub model: String,
    /// Upper bound on generated tokens per reply.
    pub max_new_tokens: u32,
    /// Request timeout for hosted API calls.
    pub timeout_seconds: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_base: "https://router.huggingface.co/v1".to_string(),
            model: "HuggingFaceH4/zephyr-7b-beta".to_string(),
            max_new_tokens: 350,
            timeout_seconds: 300,
        }
    }
}

/// Document indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Directory holding the `.txt` source documents.
    pub source_dir: String,
    /// Words per chunk.
    pub split_length: usize,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            source_dir: "data".to_string(),
            split_length: 200,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Path to the SQLite database holding chunks and embeddings.
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.ragchat/vectors.db".to_string(),
        }
    }
}

/// Retrieval settings for the query pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Maximum number of chunks placed in the prompt.
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to be retrieved.
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_score: 0.0,
        }
    }
}

/// Chat log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatLogSettings {
    /// Path to the SQLite database holding the `chat_history` table.
    pub sqlite_path: String,
}

impl Default for ChatLogSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.ragchat/rag_chat.db".to_string(),
        }
    }
}

/// Offline evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// JSON file mapping questions to acceptable answers.
    pub ground_truth_path: String,
    /// Fuzzy match score (0-100) a logged query must exceed.
    pub match_threshold: f64,
    /// Cosine similarity a reply must exceed to count as correct.
    pub similarity_threshold: f32,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            ground_truth_path: "data/ground_truth.json".to_string(),
            match_threshold: 70.0,
            similarity_threshold: 0.8,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RagChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragchat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded vector store path.
    pub fn vector_store_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }

    /// Get the expanded chat log path.
    pub fn chat_log_path(&self) -> PathBuf {
        Self::expand_path(&self.chat_log.sqlite_path)
    }

    /// Get the expanded source document directory.
    pub fn source_dir(&self) -> PathBuf {
        Self::expand_path(&self.indexing.source_dir)
    }

    /// Get the expanded ground truth file path.
    pub fn ground_truth_path(&self) -> PathBuf {
        Self::expand_path(&self.evaluation.ground_truth_path)
    }
}
