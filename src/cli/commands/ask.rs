//! Ask command implementation.

use super::preflight_or_explain;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(query: &str, settings: Settings) -> Result<()> {
    preflight_or_explain(Operation::Ask)?;

    let orchestrator = Orchestrator::new(settings)?;
    let pipeline = orchestrator.pipeline();

    let spinner = Output::spinner("Searching knowledge base...");

    match pipeline.run(query).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if let Err(e) = orchestrator.chat_log().append(query.trim(), &response.answer) {
                Output::warning(&format!("Failed to store chat turn: {}", e));
            }

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::source(&source.source, source.score, &source.content);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
