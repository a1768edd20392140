//! History command implementation.

use crate::chat_log::ChatLog;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use chrono::SecondsFormat;

/// Print the chat log, newest first.
pub fn run_history(limit: Option<usize>, settings: Settings) -> Result<()> {
    let chat_log = ChatLog::open(&settings.chat_log_path())?;
    let records = chat_log.fetch_all()?;

    if records.is_empty() {
        Output::info("The chat log is empty.");
        return Ok(());
    }

    Output::header(&format!("Chat history ({} entries)", records.len()));
    for record in records.iter().take(limit.unwrap_or(usize::MAX)) {
        Output::history_entry(
            &record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            &record.query,
            &record.response,
        );
    }

    Ok(())
}
