//! HTTP presentation layer for debates.
//!
//! Only available with the `server` feature. One route per user action of a debate front end:
//!
//! | Route | Body | Effect |
//! |-------|------|--------|
//! | `POST /documents` | `{"name", "text"}` | store a `.txt` document and re-index the corpus |
//! | `POST /debate` | `{"model"?, "temperature"?, "persona_a", "persona_b"}` | build a new debate |
//! | `POST /debate/rounds` | | play one round, return the history projection |
//! | `POST /debate/verdict` | | ask the judge, return the history projection |
//! | `GET /debate/history` | | return the history projection |
//!
//! The current debate lives behind a `tokio::sync::Mutex`, so concurrent requests against it
//! are serialised. A debate keeps the corpus snapshot it was built with; documents uploaded
//! later only ground debates configured afterwards.

use crate::chat_engine::{BackendConfig, BackendFactory};
use crate::config::DebateConfig;
use crate::corpus::CorpusIndex;
use crate::debate::DebateSession;
use crate::error::DebateError;
use crate::retrieval::Retriever;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub const NO_DEBATE_MESSAGE: &str = "Please set both personas before starting the debate.";

/// Shared server state.
pub struct AppState {
    config: DebateConfig,
    factory: Arc<dyn BackendFactory>,
    corpus: RwLock<Arc<CorpusIndex>>,
    debate: Mutex<Option<DebateSession>>,
}

impl AppState {
    pub fn new(
        config: DebateConfig,
        factory: Arc<dyn BackendFactory>,
        corpus: CorpusIndex,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            factory,
            corpus: RwLock::new(Arc::new(corpus)),
            debate: Mutex::new(None),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub persona_a: String,
    pub persona_b: String,
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents", post(upload_document))
        .route("/debate", post(configure_debate))
        .route("/debate/rounds", post(advance_round))
        .route("/debate/verdict", post(evaluate_debate))
        .route("/debate/history", get(debate_history))
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Debate server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn error_response(err: DebateError) -> Response {
    let status = match &err {
        DebateError::Configuration(_) => StatusCode::BAD_REQUEST,
        DebateError::Backend { .. } => StatusCode::BAD_GATEWAY,
        DebateError::AlreadyJudged { .. } | DebateError::NothingToJudge => StatusCode::CONFLICT,
        DebateError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::warn!("Request failed with {}: {}", status, err);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn no_debate_response() -> Response {
    (StatusCode::CONFLICT, Json(json!({ "error": NO_DEBATE_MESSAGE }))).into_response()
}

/// Keep only the final path component and force a `.txt` extension.
fn document_file_name(name: &str) -> Option<String> {
    let base = Path::new(name).file_name()?.to_string_lossy().into_owned();
    if base.trim().is_empty() {
        return None;
    }
    if base.to_lowercase().ends_with(".txt") {
        Some(base)
    } else {
        Some(format!("{}.txt", base))
    }
}

async fn store_and_reindex(
    config: &DebateConfig,
    file_name: &str,
    text: &str,
) -> Result<CorpusIndex, DebateError> {
    let splitter = config.splitter()?;
    tokio::fs::create_dir_all(&config.data_dir).await?;
    tokio::fs::write(config.data_dir.join(file_name), text).await?;
    CorpusIndex::from_directory(&config.data_dir, splitter).await
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UploadRequest>,
) -> Response {
    let file_name = match document_file_name(&request.name) {
        Some(name) => name,
        None => {
            return error_response(DebateError::Configuration(
                "document name is empty".into(),
            ))
        }
    };

    match store_and_reindex(&state.config, &file_name, &request.text).await {
        Ok(index) => {
            let chunks = index.len();
            *state.corpus.write().await = Arc::new(index);
            log::info!("Indexed {} ({} chunks in corpus)", file_name, chunks);
            (
                StatusCode::OK,
                Json(json!({ "document": file_name, "chunks": chunks })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn configure_debate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigureRequest>,
) -> Response {
    let mut settings = state.config.settings();
    if let Some(model) = request.model {
        settings.model = model;
    }
    if let Some(temperature) = request.temperature {
        settings.temperature = temperature;
    }

    let retriever: Arc<dyn Retriever> = state.corpus.read().await.clone();
    let backend = BackendConfig::new(settings, retriever);

    match DebateSession::new(
        state.factory.as_ref(),
        &backend,
        request.persona_a,
        request.persona_b,
    ) {
        Ok(session) => {
            let session_id = session.id().to_string();
            *state.debate.lock().await = Some(session);
            (
                StatusCode::CREATED,
                Json(json!({ "session_id": session_id })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

async fn advance_round(State(state): State<Arc<AppState>>) -> Response {
    let mut guard = state.debate.lock().await;
    let Some(session) = guard.as_mut() else {
        return no_debate_response();
    };
    match session.advance_round().await {
        Ok(_) => Json(session.history_projection()).into_response(),
        Err(err) => error_response(err),
    }
}

async fn evaluate_debate(State(state): State<Arc<AppState>>) -> Response {
    let mut guard = state.debate.lock().await;
    let Some(session) = guard.as_mut() else {
        return no_debate_response();
    };
    match session.evaluate().await {
        Ok(_) => Json(session.history_projection()).into_response(),
        Err(err) => error_response(err),
    }
}

async fn debate_history(State(state): State<Arc<AppState>>) -> Response {
    let guard = state.debate.lock().await;
    match guard.as_ref() {
        Some(session) => Json(session.history_projection()).into_response(),
        None => no_debate_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::document_file_name;

    #[test]
    fn document_names_are_flattened_to_txt_files() {
        assert_eq!(document_file_name("notes.txt").as_deref(), Some("notes.txt"));
        assert_eq!(
            document_file_name("../../etc/passwd").as_deref(),
            Some("passwd.txt")
        );
        assert_eq!(document_file_name("plot").as_deref(), Some("plot.txt"));
        assert_eq!(document_file_name(""), None);
        assert_eq!(document_file_name(".."), None);
    }
}
