//! CLI module for ragchat.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// ragchat - retrieval-augmented chatbot
///
/// Indexes a directory of text files, answers questions over HTTP or the
/// command line, logs every turn and scores logged answers against ground truth.
#[derive(Parser, Debug)]
#[command(name = "ragchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RAGCHAT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index the source documents if needed, then start the web server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Index the source documents into the vector store
    Index,

    /// Ask a single question and log the answer
    Ask {
        /// The question to ask
        query: String,
    },

    /// Show the chat log, newest first
    History {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Score logged answers against the ground truth
    Evaluate {
        /// Also run every ground-truth question through the pipeline
        #[arg(long)]
        retrieval: bool,

        /// Ground-truth JSON file (defaults to evaluation.ground_truth_path)
        #[arg(short, long)]
        ground_truth: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
