//! Evaluate command implementation.

use super::preflight_or_explain;
use crate::chat_log::ChatLog;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::evaluation::Evaluator;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Score logged answers, and optionally the pipeline itself, against ground truth.
pub async fn run_evaluate(
    retrieval: bool,
    ground_truth: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    preflight_or_explain(Operation::Evaluate { retrieval })?;

    if let Some(path) = ground_truth {
        settings.evaluation.ground_truth_path = path;
    }
    let evaluator = Evaluator::from_settings(&settings)?;

    if retrieval {
        let orchestrator = Orchestrator::new(settings)?;
        evaluate_responses(&evaluator, orchestrator.chat_log())?;
        evaluate_retrieval(&evaluator, &orchestrator).await?;
    } else {
        let chat_log = ChatLog::open(&settings.chat_log_path())?;
        evaluate_responses(&evaluator, &chat_log)?;
    }

    Ok(())
}

fn evaluate_responses(evaluator: &Evaluator, chat_log: &ChatLog) -> Result<()> {
    let report = evaluator.evaluate_chat_log(chat_log)?;

    Output::header("Response quality");
    Output::score("BLEU", report.bleu);
    Output::score("ROUGE-L", report.rouge_l);
    Output::kv("Scored", &report.scored.to_string());
    Output::kv("Excluded (no ground-truth match)", &report.excluded.to_string());

    if report.scored == 0 {
        Output::warning("No logged query matched a ground-truth question; scores are 0.");
    }

    Ok(())
}

async fn evaluate_retrieval(evaluator: &Evaluator, orchestrator: &Orchestrator) -> Result<()> {
    let spinner = Output::spinner(&format!(
        "Running {} ground-truth questions through the pipeline...",
        evaluator.ground_truth().len()
    ));

    let result = evaluator.evaluate_retrieval(&orchestrator.pipeline()).await;
    spinner.finish_and_clear();
    let report = result?;

    Output::header("Retrieval accuracy");
    Output::score("Accuracy", report.accuracy);
    Output::kv("Correct", &format!("{}/{}", report.correct, report.total));
    Output::info("Accuracy compares generated answers, not retrieved chunks, with the ground truth.");

    Ok(())
}
