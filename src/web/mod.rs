//! HTTP front end.
//!
//! Serves the query form, a JSON chat endpoint and the chat history. State is
//! built once at startup and shared read-only between requests.

mod handlers;
mod templates;

pub use templates::{render_index, IndexPage};

use crate::chat_log::ChatLog;
use crate::rag::QueryPipeline;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
pub struct AppState {
    pub pipeline: QueryPipeline,
    pub chat_log: ChatLog,
}

impl AppState {
    pub fn new(pipeline: QueryPipeline, chat_log: ChatLog) -> Arc<Self> {
        Arc::new(Self { pipeline, chat_log })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index_form).post(handlers::index_submit))
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::history))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(state)
}

/// Serve the application on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{KeywordEmbedder, RecordingGenerator};
    use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const MAX_BODY: usize = 1024 * 1024;

    struct Harness {
        app: Router,
        generator: Arc<RecordingGenerator>,
        dir: TempDir,
    }

    async fn harness(generator: RecordingGenerator) -> Harness {
        let embedder = Arc::new(KeywordEmbedder::new());
        let store = Arc::new(MemoryVectorStore::new());
        let text = "Autism is a neurodevelopmental condition that affects communication and behavior.";
        store
            .upsert_batch(&[Document::new(
                "autism.txt".into(),
                text.into(),
                embedder.vector(text),
                0,
            )])
            .await
            .unwrap();

        let generator = Arc::new(generator);
        let pipeline = QueryPipeline::new(store, embedder, generator.clone());

        let dir = tempfile::tempdir().unwrap();
        let chat_log = ChatLog::open(&dir.path().join("rag_chat.db")).unwrap();

        Harness {
            app: router(AppState::new(pipeline, chat_log)),
            generator,
            dir,
        }
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), MAX_BODY).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_chat_then_history_lists_query_first() {
        let h = harness(RecordingGenerator::new()).await;

        let response = h
            .app
            .clone()
            .oneshot(form_post("/chat", "query=Hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = h
            .app
            .clone()
            .oneshot(form_post("/chat", "query=What+is+autism%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["query"], "What is autism?");
        let reply = json["response"].as_str().unwrap();
        assert!(!reply.is_empty());
        assert!(reply.contains("neurodevelopmental"));

        let response = h.app.clone().oneshot(get("/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let history = body_json(response).await;
        let records = history.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["query"], "What is autism?");
        assert_eq!(records[1]["query"], "Hello");
    }

    #[tokio::test]
    async fn test_empty_query_is_bad_request() {
        let h = harness(RecordingGenerator::new()).await;

        for body in ["query=", "query=+++", ""] {
            let response = h.app.clone().oneshot(form_post("/chat", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        let response = h.app.clone().oneshot(form_post("/", "query=")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(h.generator.prompts().is_empty());
        let history = body_json(h.app.clone().oneshot(get("/history")).await.unwrap()).await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_is_bad_gateway() {
        let h = harness(RecordingGenerator::failing()).await;

        let response = h
            .app
            .clone()
            .oneshot(form_post("/chat", "query=What+is+AI%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("generation unavailable:"));

        let history = body_json(h.app.clone().oneshot(get("/history")).await.unwrap()).await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_form_page_round_trip() {
        let h = harness(RecordingGenerator::with_reply("A <b>condition</b>")).await;

        let response = h.app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<form"));

        let response = h
            .app
            .clone()
            .oneshot(form_post("/", "query=What+is+autism%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("What is autism?"));
        assert!(html.contains("A &lt;b&gt;condition&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn test_history_unavailable() {
        let h = harness(RecordingGenerator::new()).await;
        std::fs::remove_dir_all(h.dir.path()).unwrap();

        let response = h.app.clone().oneshot(get("/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("chat history unavailable:"));
    }

    #[tokio::test]
    async fn test_chat_survives_log_failure() {
        let h = harness(RecordingGenerator::with_reply("ok")).await;
        std::fs::remove_dir_all(h.dir.path()).unwrap();

        let response = h
            .app
            .clone()
            .oneshot(form_post("/chat", "query=Hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["response"], "ok");
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let h = harness(RecordingGenerator::new()).await;

        let response = h.app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));

        let response = h.app.clone().oneshot(get("/invalid_endpoint")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
