//! Web server command.
//!
//! Indexes the source documents when the vector store is empty, then serves
//! the chat front end.

use super::index::{index_with_spinner, print_report};
use super::preflight_or_explain;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::web::{self, AppState};
use anyhow::Result;

/// Run the web server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> Result<()> {
    preflight_or_explain(Operation::Serve)?;

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let report = index_with_spinner(&orchestrator).await?;
    print_report(&report);

    let state = AppState::new(orchestrator.pipeline(), orchestrator.chat_log().clone());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("ragchat server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Chat form", "GET  /  and  POST /");
    Output::kv("Chat (JSON)", "POST /chat");
    Output::kv("History", "GET  /history");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    web::serve(listener, state).await?;

    Ok(())
}
