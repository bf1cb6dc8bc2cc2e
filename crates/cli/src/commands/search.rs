use std::sync::Arc;

use bazaar_agent::{ChatCompletionsClient, SingleShotOrchestrator};
use bazaar_core::config::{AppConfig, LoadOptions, LogFormat};
use bazaar_marketplace::MarketplaceClient;

use super::{escape_json, CommandResult};

const COMMAND: &str = "search";

pub fn run(prompt: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2)
        }
    };
    init_logging(&config);

    let inference = match ChatCompletionsClient::from_config(&config.llm) {
        Ok(client) => client,
        Err(error) => return CommandResult::failure(COMMAND, "client_setup", error.to_string(), 3),
    };
    let search = match MarketplaceClient::from_config(&config.marketplace) {
        Ok(client) => client,
        Err(error) => return CommandResult::failure(COMMAND, "client_setup", error.to_string(), 3),
    };

    let orchestrator = SingleShotOrchestrator::new(Arc::new(inference), Arc::new(search));
    run_with(&orchestrator, prompt)
}

/// Runs the pipeline and renders the result payload. Exit code 1 marks an error payload.
pub fn run_with(orchestrator: &SingleShotOrchestrator, prompt: &str) -> CommandResult {
    let result = orchestrator.run_blocking(prompt);
    let exit_code = if result.is_error() { 1 } else { 0 };

    let output = serde_json::to_string_pretty(&result).unwrap_or_else(|error| {
        format!("{{\"error\":\"System error: {}\"}}", escape_json(&error.to_string()))
    });
    CommandResult { exit_code, output }
}

// Logs go to stderr so stdout carries only the result payload.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Filter used when `RUST_LOG` is unset: the configured level for every target.
fn level_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(level.trim().to_ascii_lowercase())
}
