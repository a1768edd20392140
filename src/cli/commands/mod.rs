//! CLI command implementations.

mod ask;
mod config;
mod evaluate;
mod history;
mod index;
mod serve;

pub use ask::run_ask;
pub use config::run_config;
pub use evaluate::run_evaluate;
pub use history::run_history;
pub use index::run_index;
pub use serve::run_serve;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;

/// Run pre-flight checks, printing a hint when they fail.
fn preflight_or_explain(operation: Operation) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        Output::info("Add the token to your environment or to a .env file in the working directory.");
        return Err(e.into());
    }
    Ok(())
}
