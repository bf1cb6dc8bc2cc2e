use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bazaar_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct Field {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<Field> {
    let llm_api_key = match &config.llm.api_key {
        Some(key) => redact_secret(key.expose_secret()),
        None => "<unset>".to_string(),
    };

    vec![
        Field {
            key_path: "llm.provider",
            value: format!("{:?}", config.llm.provider),
            env_keys: &["BAZAAR_LLM_PROVIDER"],
        },
        Field {
            key_path: "llm.model",
            value: config.llm.model.clone(),
            env_keys: &["BAZAAR_LLM_MODEL"],
        },
        Field {
            key_path: "llm.base_url",
            value: config.llm.base_url.clone(),
            env_keys: &["BAZAAR_LLM_BASE_URL"],
        },
        Field {
            key_path: "llm.api_key",
            value: llm_api_key,
            env_keys: &["BAZAAR_LLM_API_KEY", "LLM_MODEL_API_KEY"],
        },
        Field {
            key_path: "llm.temperature",
            value: config.llm.temperature.to_string(),
            env_keys: &["BAZAAR_LLM_TEMPERATURE"],
        },
        Field {
            key_path: "llm.timeout_secs",
            value: config.llm.timeout_secs.to_string(),
            env_keys: &["BAZAAR_LLM_TIMEOUT_SECS"],
        },
        Field {
            key_path: "marketplace.search_url",
            value: config.marketplace.search_url.clone(),
            env_keys: &["BAZAAR_MARKETPLACE_SEARCH_URL"],
        },
        Field {
            key_path: "marketplace.token",
            value: redact_secret(config.marketplace.token.expose_secret()),
            env_keys: &["BAZAAR_MARKETPLACE_TOKEN", "BASALAM_TOKEN"],
        },
        Field {
            key_path: "marketplace.timeout_secs",
            value: config.marketplace.timeout_secs.to_string(),
            env_keys: &["BAZAAR_MARKETPLACE_TIMEOUT_SECS"],
        },
        Field {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["BAZAAR_SERVER_BIND_ADDRESS"],
        },
        Field {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["BAZAAR_SERVER_PORT"],
        },
        Field {
            key_path: "server.request_timeout_secs",
            value: config.server.request_timeout_secs.to_string(),
            env_keys: &["BAZAAR_SERVER_REQUEST_TIMEOUT_SECS"],
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["BAZAAR_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["BAZAAR_LOGGING_LEVEL", "BAZAAR_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["BAZAAR_LOGGING_FORMAT", "BAZAAR_LOG_FORMAT"],
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("bazaar.toml"), PathBuf::from("config/bazaar.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_key = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps a short prefix of `sk-`/`pat-` style keys, hides everything else.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.split_once('-') {
        Some((prefix, _)) if prefix.len() <= 6 => format!("{prefix}-***"),
        _ => "<redacted>".to_string(),
    }
}
