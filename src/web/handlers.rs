//! Request handlers.

use super::templates::{render_index, IndexPage};
use super::AppState;
use crate::error::RagChatError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
pub(crate) struct QueryForm {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct ChatResponse {
    query: String,
    response: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Status and message for a failed chat turn.
fn classify(err: &RagChatError) -> (StatusCode, String) {
    match err {
        RagChatError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        e if e.is_upstream() => (
            StatusCode::BAD_GATEWAY,
            format!("generation unavailable: {}", e),
        ),
        e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn json_error(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn html_page(status: StatusCode, page: IndexPage<'_>) -> Response {
    match render_index(&page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Run the pipeline and log the completed turn.
async fn answer(state: &AppState, query: &str) -> Result<String, RagChatError> {
    if query.is_empty() {
        return Err(RagChatError::InvalidInput(
            "query must not be empty".to_string(),
        ));
    }

    let response = state.pipeline.run(query).await?;

    if let Err(e) = state.chat_log.append(query, &response.answer) {
        warn!("Failed to store chat turn: {}", e);
    }

    Ok(response.answer)
}

// === Handlers ===

pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(crate) async fn index_form() -> Response {
    html_page(StatusCode::OK, IndexPage::default())
}

pub(crate) async fn index_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QueryForm>,
) -> Response {
    let query = form.query.trim();
    match answer(&state, query).await {
        Ok(response) => html_page(
            StatusCode::OK,
            IndexPage {
                query: Some(query),
                response: Some(&response),
                error: None,
            },
        ),
        Err(e) => {
            let (status, message) = classify(&e);
            warn!(status = %status, "Chat turn failed: {}", e);
            html_page(
                status,
                IndexPage {
                    query: Some(query),
                    response: None,
                    error: Some(&message),
                },
            )
        }
    }
}

pub(crate) async fn chat(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QueryForm>,
) -> Response {
    let query = form.query.trim();
    match answer(&state, query).await {
        Ok(response) => Json(ChatResponse {
            query: query.to_string(),
            response,
        })
        .into_response(),
        Err(e) => {
            let (status, message) = classify(&e);
            warn!(status = %status, "Chat turn failed: {}", e);
            json_error(status, message)
        }
    }
}

pub(crate) async fn history(State(state): State<Arc<AppState>>) -> Response {
    match state.chat_log.fetch_all() {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!("Failed to read chat history: {}", e);
            json_error(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("chat history unavailable: {}", e),
            )
        }
    }
}

pub(crate) async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found".to_string())
}
