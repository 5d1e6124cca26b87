//! Thin HTTP surface over the tournament core.
//!
//! Routes mirror the hosted service: health check, tournament run, and
//! read-only access to the file-backed candidate store. All state is
//! injected through [`AppState`]; there are no process-wide singletons.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::error::TournamentError;
use crate::judge::FallbackPolicy;
use crate::oracle::Oracle;
use crate::store::{self, StoreError};
use crate::tournament::{run_tournament, TournamentConfig};
use crate::types::{Candidate, TournamentResult};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub oracle: Arc<dyn Oracle>,
    pub store_path: PathBuf,
}

/// Request body for `POST /api/tournament/run`.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub candidates: Vec<Candidate>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_role")]
    pub role: String,
    /// Inter-batch delay in seconds.
    #[serde(default = "default_delay")]
    pub delay: f64,
}

fn default_batch_size() -> usize {
    4
}

fn default_role() -> String {
    "software engineering".to_string()
}

fn default_delay() -> f64 {
    2.0
}

/// Error shape returned to HTTP clients: `{"detail": "..."}` with the
/// mapped status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.message }));
        (self.status, body).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        let status = match &err {
            TournamentError::OddCandidates(_)
            | TournamentError::OddBatchSize(_)
            | TournamentError::NoCandidates => StatusCode::BAD_REQUEST,
            TournamentError::InvalidVerdict(_) | TournamentError::Oracle(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Io(_) | StoreError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tournament/health", get(health))
        .route("/api/tournament/run", post(run))
        .route("/api/tournament/candidates", get(all_candidates))
        .route("/api/tournament/sample-candidates", get(sample_candidates))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Tournament API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Tournament API is running",
    }))
}

async fn run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<TournamentResult>, ApiError> {
    if !request.delay.is_finite() || request.delay < 0.0 {
        return Err(ApiError::bad_request(format!(
            "delay must be a non-negative number of seconds, got {}",
            request.delay
        )));
    }

    let config = TournamentConfig {
        batch_size: request.batch_size,
        role: request.role,
        delay: Duration::from_secs_f64(request.delay),
        fallback: FallbackPolicy::Random,
    };

    let result = run_tournament(state.oracle.as_ref(), request.candidates, &config).await?;
    Ok(Json(result))
}

async fn all_candidates(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let candidates = store::load_candidates(&state.store_path)?;
    Ok(Json(serde_json::json!({ "candidates": candidates })))
}

async fn sample_candidates(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let candidates = store::sample_candidates(&state.store_path)?;
    Ok(Json(serde_json::json!({ "candidates": candidates })))
}
