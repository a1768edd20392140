//! Pre-flight checks before expensive operations.
//!
//! Validates that the hosted-API token is available before starting
//! operations that would otherwise fail on the first request.

use crate::error::{RagChatError, Result};
use crate::openai::{api_token, TOKEN_VARS};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving may index and always answers queries.
    Serve,
    /// Indexing calls the embedding API.
    Index,
    /// Asking calls the embedding and generation APIs.
    Ask,
    /// Evaluation calls the hosted APIs only when scoring retrieval.
    Evaluate { retrieval: bool },
    /// Reading the chat log is local.
    History,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Serve | Operation::Index | Operation::Ask => check_api_token(),
        Operation::Evaluate { retrieval: true } => check_api_token(),
        Operation::Evaluate { retrieval: false } | Operation::History => Ok(()),
    }
}

/// Check that a Hugging Face API token is configured.
fn check_api_token() -> Result<()> {
    if api_token().is_some() {
        return Ok(());
    }
    Err(RagChatError::Config(format!(
        "No API token found. Set one of {} (e.g. export {}='hf_...')",
        TOKEN_VARS.join(", "),
        TOKEN_VARS[0]
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_operations_have_no_requirements() {
        assert!(check(Operation::History).is_ok());
        assert!(check(Operation::Evaluate { retrieval: false }).is_ok());
    }
}
