use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use bazaar_core::config::AppConfig;
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct HealthState {
    provider: String,
    model: String,
    search_url: String,
}

impl HealthState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: format!("{:?}", config.llm.provider).to_ascii_lowercase(),
            model: config.llm.model.clone(),
            search_url: config.marketplace.search_url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub inference: HealthCheck,
    pub marketplace: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Readiness of the service itself. Upstream reachability is not probed here;
/// a search request is the only place upstream calls are made.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "bazaar-server runtime initialized".to_string(),
        },
        inference: HealthCheck {
            status: "configured",
            detail: format!("{} model `{}`", state.provider, state.model),
        },
        marketplace: HealthCheck {
            status: "configured",
            detail: format!("search endpoint {}", state.search_url),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
