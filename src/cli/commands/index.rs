//! Index command implementation.

use super::preflight_or_explain;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::indexing::IndexReport;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the index command.
pub async fn run_index(settings: Settings) -> Result<()> {
    preflight_or_explain(Operation::Index)?;

    let orchestrator = Orchestrator::new(settings)?;
    let report = index_with_spinner(&orchestrator).await?;
    print_report(&report);

    Ok(())
}

/// Index the source directory behind a spinner.
pub(super) async fn index_with_spinner(orchestrator: &Orchestrator) -> Result<IndexReport> {
    let source_dir = orchestrator.settings().source_dir();
    let spinner = Output::spinner(&format!("Indexing {}...", source_dir.display()));

    match orchestrator.index().await {
        Ok(report) => {
            spinner.finish_and_clear();
            Ok(report)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Indexing failed: {}", e));
            Err(e.into())
        }
    }
}

pub(super) fn print_report(report: &IndexReport) {
    if report.skipped {
        Output::info(&format!(
            "Vector store already holds {} documents, nothing to index.",
            report.documents_in_store
        ));
        return;
    }

    Output::success(&format!(
        "Indexed {} chunks from {} files.",
        report.chunks_indexed, report.files_loaded
    ));
    Output::kv("Documents in store", &report.documents_in_store.to_string());
}
