use axum::{
    routing::{get, post},
    Router,
    Json,
    Form,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use validator::Validate;

use crate::document::Document;
use crate::error::{AskError, IngestError};
use crate::llm::ConversationTurn;
use crate::session::Session;

pub mod templates;

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Session>>,
}

#[derive(Deserialize, Validate)]
pub struct AskForm {
    #[validate(length(min = 1, max = 2000))]
    question: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    ready: bool,
    chunks: usize,
    turns: usize,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    turns: Vec<ConversationTurn>,
}

/// Create and configure the web UI router around a single session.
pub fn create_api(session: Session, max_upload_bytes: usize) -> Router {
    let state = AppState {
        session: Arc::new(RwLock::new(session)),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/upload", post(upload_handler))
        .route("/ask", post(ask_handler))
        .route("/history", get(history_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let session = state.session.read().await;
    let status = match session.retriever() {
        Some(retriever) => format!("{} chunks indexed", retriever.index().len()),
        None => "No documents uploaded yet".to_string(),
    };
    Html(templates::render_page(session.history(), &status))
}

async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut documents = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_page(StatusCode::BAD_REQUEST, &format!("Invalid upload: {}", e)),
        };

        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return error_page(StatusCode::BAD_REQUEST, &format!("Failed to read {}: {}", name, e)),
        };
        // Browsers send an empty part when no file was picked.
        if bytes.is_empty() {
            continue;
        }
        documents.push(Document::new(name, bytes.to_vec()));
    }

    if documents.is_empty() {
        return error_page(StatusCode::BAD_REQUEST, "Please choose at least one PDF file");
    }

    let mut session = state.session.write().await;
    match session.ingest(documents).await {
        Ok(summary) => {
            info!(documents = ?summary.documents, chunks = summary.chunks, "upload ingested");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            warn!(error = %e, "upload failed");
            error_page(ingest_status(&e), &e.to_string())
        }
    }
}

async fn ask_handler(State(state): State<AppState>, Form(form): Form<AskForm>) -> Response {
    if let Err(e) = form.validate() {
        return error_page(StatusCode::UNPROCESSABLE_ENTITY, &format!("Invalid question: {}", e));
    }

    let mut session = state.session.write().await;
    match session.ask(&form.question).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            warn!(error = %e, "question failed");
            error_page(ask_status(&e), &e.to_string())
        }
    }
}

async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.read().await;
    Json(HistoryResponse {
        turns: session.history().to_vec(),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.session.read().await;
    Json(HealthResponse {
        status: "Server is running and healthy".to_string(),
        ready: session.is_ready(),
        chunks: session.retriever().map(|r| r.index().len()).unwrap_or(0),
        turns: session.history().len(),
    })
}

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, Html(templates::render_error(message))).into_response()
}

fn ingest_status(error: &IngestError) -> StatusCode {
    match error {
        IngestError::UnreadableDocument { .. } | IngestError::EmptyCorpus => StatusCode::UNPROCESSABLE_ENTITY,
        IngestError::EmbeddingService(_) => StatusCode::BAD_GATEWAY,
    }
}

fn ask_status(error: &AskError) -> StatusCode {
    match error {
        AskError::NoIndexLoaded => StatusCode::CONFLICT,
        AskError::EmptyQuestion => StatusCode::UNPROCESSABLE_ENTITY,
        AskError::EmbeddingService(_) | AskError::CompletionService(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineSettings;
    use crate::providers::traits::CompletionProvider;
    use crate::providers::utils::HashingEmbedder;
    use crate::session::PipelineServices;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(Clone)]
    struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        async fn complete(&self, _prompt: &str, history: &[ConversationTurn]) -> Result<String> {
            Ok(format!("answer #{}", history.len() + 1))
        }

        async fn get_model_info(&self) -> Result<String> {
            Ok("echo".to_string())
        }
    }

    fn app() -> Router {
        let services = PipelineServices {
            embedder: Arc::new(HashingEmbedder::default()),
            completion: Arc::new(EchoProvider),
        };
        let session = Session::new(services, PipelineSettings::default()).unwrap();
        create_api(session, 1024 * 1024)
    }

    #[tokio::test]
    async fn test_health_reports_uninitialized_session() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["turns"], 0);
    }

    #[tokio::test]
    async fn test_ask_before_upload_is_conflict() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ask")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("question=What+is+here%3F"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ask")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("question="))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_upload_of_non_pdf_is_unprocessable() {
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"notes.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\nnot a pdf\r\n--{b}--\r\n",
            b = boundary
        );
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header("content-type", format!("multipart/form-data; boundary={}", boundary))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("notes.pdf"));
    }

    #[tokio::test]
    async fn test_index_page_renders() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("No documents uploaded yet"));
    }
}
