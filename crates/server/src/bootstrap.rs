use std::sync::Arc;
use std::time::Duration;

use bazaar_agent::{ChatCompletionsClient, SingleShotOrchestrator};
use bazaar_core::config::{AppConfig, ConfigError};
use bazaar_core::{InferenceError, SearchError};
use bazaar_marketplace::MarketplaceClient;
use thiserror::Error;
use tracing::info;

use crate::health::HealthState;
use crate::search::SearchState;

pub struct Application {
    pub config: AppConfig,
    pub orchestrator: Arc<SingleShotOrchestrator>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("inference client setup failed: {0}")]
    Inference(#[source] InferenceError),
    #[error("marketplace client setup failed: {0}")]
    Marketplace(#[source] SearchError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    config.validate()?;

    let inference =
        ChatCompletionsClient::from_config(&config.llm).map_err(BootstrapError::Inference)?;
    let search =
        MarketplaceClient::from_config(&config.marketplace).map_err(BootstrapError::Marketplace)?;
    info!(
        event_name = "system.bootstrap.clients_ready",
        correlation_id = "bootstrap",
        provider = ?config.llm.provider,
        model = %config.llm.model,
        search_url = %config.marketplace.search_url,
        "inference and marketplace clients constructed"
    );

    let orchestrator = SingleShotOrchestrator::new(Arc::new(inference), Arc::new(search));
    Ok(Application { config, orchestrator: Arc::new(orchestrator) })
}

impl Application {
    pub fn search_state(&self) -> SearchState {
        SearchState::new(
            self.orchestrator.clone(),
            Duration::from_secs(self.config.server.request_timeout_secs),
        )
    }

    pub fn health_state(&self) -> HealthState {
        HealthState::from_config(&self.config)
    }
}
