use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use bazaar_agent::SingleShotOrchestrator;
use bazaar_core::PipelineResult;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

pub const ROOT_MESSAGE: &str = "Bazaar search agent API - use POST /search to find products";

#[derive(Clone)]
pub struct SearchState {
    orchestrator: Arc<SingleShotOrchestrator>,
    request_timeout: Duration,
}

impl SearchState {
    pub fn new(orchestrator: Arc<SingleShotOrchestrator>, request_timeout: Duration) -> Self {
        Self { orchestrator, request_timeout }
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchRequest {
    pub prompt: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

pub fn router(state: SearchState) -> Router {
    Router::new().route("/", get(root)).route("/search", post(search)).with_state(state)
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: ROOT_MESSAGE })
}

pub async fn search(
    State(state): State<SearchState>,
    Json(request): Json<SearchRequest>,
) -> Json<PipelineResult> {
    Json(handle_request(&state, &request.prompt).await)
}

/// Runs one prompt through the pipeline under the configured request deadline.
///
/// Always yields a result payload; a deadline overrun becomes an error payload.
pub async fn handle_request(state: &SearchState, prompt: &str) -> PipelineResult {
    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "server.search.received",
        correlation_id = %correlation_id,
        prompt_chars = prompt.chars().count(),
        "search request received"
    );

    let deadline = state.request_timeout();
    let run = state.orchestrator.run_with_correlation(prompt, &correlation_id);
    match tokio::time::timeout(deadline, run).await {
        Ok(result) => {
            info!(
                event_name = "server.search.completed",
                correlation_id = %correlation_id,
                is_error = result.is_error(),
                "search request completed"
            );
            result
        }
        Err(_) => {
            warn!(
                event_name = "server.search.timeout",
                correlation_id = %correlation_id,
                timeout_ms = deadline.as_millis() as u64,
                "search request exceeded its deadline"
            );
            PipelineResult::system_error(format!(
                "request timed out after {} ms",
                deadline.as_millis()
            ))
        }
    }
}
