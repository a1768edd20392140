//! ragchat - a retrieval-augmented chatbot
//!
//! Answers questions from a directory of text documents, logs every chat turn
//! and scores logged answers against a ground-truth file.
//!
//! # Overview
//!
//! - The indexing workflow cleans and splits `.txt` files into word windows,
//!   embeds them through a hosted API and stores them in SQLite
//! - The query pipeline embeds a question, retrieves the closest chunks,
//!   renders the prompt template and asks a hosted LLM for the answer
//! - The web front end serves a query form, a JSON chat endpoint and the chat history
//! - The evaluator fuzzy-matches logged questions to ground truth and reports
//!   BLEU, ROUGE-L and retrieval accuracy
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `chunking` - Text cleaning and word-window splitting
//! - `embedding` - Embedding generation
//! - `generation` - Text generation
//! - `vector_store` - Vector database abstraction
//! - `indexing` - The indexing workflow
//! - `rag` - The query pipeline
//! - `chat_log` - Persistent chat history
//! - `web` - HTTP front end
//! - `evaluation` - Offline scoring
//! - `orchestrator` - Service wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use ragchat::config::Settings;
//! use ragchat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     orchestrator.index().await?;
//!     let response = orchestrator.pipeline().run("What is autism?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chat_log;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod generation;
pub mod indexing;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;
pub mod web;

#[cfg(test)]
mod testing;

pub use error::{RagChatError, Result};
