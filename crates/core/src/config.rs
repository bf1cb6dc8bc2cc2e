use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub marketplace: MarketplaceConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct MarketplaceConfig {
    pub search_url: String,
    pub token: SecretString,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// All supported providers speak the OpenAI chat-completions protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(alias = "open_router")]
    OpenRouter,
    #[serde(alias = "open_ai")]
    OpenAi,
    Ollama,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub marketplace_search_url: Option<String>,
    pub marketplace_token: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                provider: LlmProvider::OpenRouter,
                api_key: None,
                base_url: "https://openrouter.ai/api/v1".to_string(),
                model: "meta-llama/llama-3.3-8b-instruct:free".to_string(),
                temperature: 0.0,
                timeout_secs: 30,
            },
            marketplace: MarketplaceConfig {
                search_url: "https://search.basalam.com/ai-engine/api/v2.0/product/search"
                    .to_string(),
                token: String::new().into(),
                timeout_secs: 15,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8000,
                request_timeout_secs: 60,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openrouter" | "open_router" => Ok(Self::OpenRouter),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected openrouter|openai|ollama)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl LlmProvider {
    pub fn requires_api_key(self) -> bool {
        matches!(self, Self::OpenRouter | Self::OpenAi)
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let config = Self::resolve(options)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies every layer but skips `validate()`, so callers can inspect an incomplete config.
    pub fn resolve(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("bazaar.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(marketplace) = patch.marketplace {
            if let Some(search_url) = marketplace.search_url {
                self.marketplace.search_url = search_url;
            }
            if let Some(marketplace_token_value) = marketplace.token {
                self.marketplace.token = secret_value(marketplace_token_value);
            }
            if let Some(timeout_secs) = marketplace.timeout_secs {
                self.marketplace.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(request_timeout_secs) = server.request_timeout_secs {
                self.server.request_timeout_secs = request_timeout_secs;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("BAZAAR_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        let llm_api_key =
            read_env("BAZAAR_LLM_API_KEY").or_else(|| read_env("LLM_MODEL_API_KEY"));
        if let Some(value) = llm_api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("BAZAAR_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("BAZAAR_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("BAZAAR_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("BAZAAR_LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = read_env("BAZAAR_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("BAZAAR_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("BAZAAR_MARKETPLACE_SEARCH_URL") {
            self.marketplace.search_url = value;
        }
        let marketplace_token =
            read_env("BAZAAR_MARKETPLACE_TOKEN").or_else(|| read_env("BASALAM_TOKEN"));
        if let Some(value) = marketplace_token {
            self.marketplace.token = secret_value(value);
        }
        if let Some(value) = read_env("BAZAAR_MARKETPLACE_TIMEOUT_SECS") {
            self.marketplace.timeout_secs = parse_u64("BAZAAR_MARKETPLACE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("BAZAAR_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("BAZAAR_SERVER_PORT") {
            self.server.port = parse_u16("BAZAAR_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("BAZAAR_SERVER_REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs =
                parse_u64("BAZAAR_SERVER_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("BAZAAR_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("BAZAAR_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("BAZAAR_LOGGING_LEVEL").or_else(|| read_env("BAZAAR_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("BAZAAR_LOGGING_FORMAT").or_else(|| read_env("BAZAAR_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = llm_base_url;
        }
        if let Some(search_url) = overrides.marketplace_search_url {
            self.marketplace.search_url = search_url;
        }
        if let Some(marketplace_token) = overrides.marketplace_token {
            self.marketplace.token = secret_value(marketplace_token);
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_marketplace(&self.marketplace)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("bazaar.toml"), PathBuf::from("config/bazaar.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    if !is_http_url(&llm.base_url) {
        return Err(ConfigError::Validation(
            "llm.base_url must start with http:// or https://".to_string(),
        ));
    }

    if llm.provider.requires_api_key() {
        let missing = llm
            .api_key
            .as_ref()
            .map(|value| value.expose_secret().trim().is_empty())
            .unwrap_or(true);
        if missing {
            return Err(ConfigError::Validation(
                "llm.api_key is required for openrouter/openai providers (set BAZAAR_LLM_API_KEY)"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_marketplace(marketplace: &MarketplaceConfig) -> Result<(), ConfigError> {
    if !is_http_url(&marketplace.search_url) {
        return Err(ConfigError::Validation(
            "marketplace.search_url must start with http:// or https://".to_string(),
        ));
    }

    if marketplace.token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "marketplace.token is required (set BAZAAR_MARKETPLACE_TOKEN to a personal access token)"
                .to_string(),
        ));
    }

    if marketplace.timeout_secs == 0 || marketplace.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "marketplace.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "server.request_timeout_secs must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    marketplace: Option<MarketplacePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct MarketplacePatch {
    search_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    request_timeout_secs: Option<u64>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LlmProvider, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const CREDENTIAL_VARS: [&str; 4] =
        ["BAZAAR_LLM_API_KEY", "BAZAAR_MARKETPLACE_TOKEN", "LLM_MODEL_API_KEY", "BASALAM_TOKEN"];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    fn set_credentials() {
        env::set_var("BAZAAR_LLM_API_KEY", "sk-or-test");
        env::set_var("BAZAAR_MARKETPLACE_TOKEN", "mp-test");
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        env::set_var("TEST_LLM_KEY", "sk-from-env");
        env::set_var("TEST_MARKETPLACE_TOKEN", "mp-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("bazaar.toml");
            fs::write(
                &path,
                r#"
[llm]
api_key = "${TEST_LLM_KEY}"

[marketplace]
token = "${TEST_MARKETPLACE_TOKEN}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.llm.api_key.as_ref().map(|key| key.expose_secret() == "sk-from-env")
                    == Some(true),
                "llm api key should be loaded from environment",
            )?;
            ensure(
                config.marketplace.token.expose_secret() == "mp-from-env",
                "marketplace token should be loaded from environment",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_LLM_KEY", "TEST_MARKETPLACE_TOKEN"]);
        result
    }

    #[test]
    fn file_provider_accepts_every_documented_spelling() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);
        clear_vars(&["BAZAAR_LLM_PROVIDER"]);
        set_credentials();

        let cases = [
            ("openrouter", LlmProvider::OpenRouter),
            ("open_router", LlmProvider::OpenRouter),
            ("openai", LlmProvider::OpenAi),
            ("open_ai", LlmProvider::OpenAi),
            ("ollama", LlmProvider::Ollama),
        ];

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            for (spelling, expected) in cases {
                let path = dir.path().join(format!("{spelling}.toml"));
                fs::write(&path, format!("[llm]\nprovider = \"{spelling}\"\n"))
                    .map_err(|err| err.to_string())?;

                let config = AppConfig::load(LoadOptions {
                    config_path: Some(path),
                    ..LoadOptions::default()
                })
                .map_err(|err| format!("provider `{spelling}` failed to load: {err}"))?;

                if config.llm.provider != expected {
                    return Err(format!(
                        "provider `{spelling}` loaded as {:?}",
                        config.llm.provider
                    ));
                }
            }
            Ok(())
        })();

        clear_vars(&CREDENTIAL_VARS);
        result
    }

    #[test]
    fn resolve_returns_config_that_load_rejects() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        let resolved = AppConfig::resolve(LoadOptions::default())
            .map_err(|err| format!("resolve failed: {err}"))?;
        ensure(resolved.llm.api_key.is_none(), "api key should be unset")?;
        ensure(
            matches!(resolved.validate(), Err(ConfigError::Validation(_))),
            "resolved config should still fail validation",
        )?;
        ensure(AppConfig::load(LoadOptions::default()).is_err(), "load should validate")
    }

    #[test]
    fn legacy_credential_variables_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        env::set_var("LLM_MODEL_API_KEY", "sk-legacy");
        env::set_var("BASALAM_TOKEN", "legacy-token");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.llm.api_key.as_ref().map(|key| key.expose_secret() == "sk-legacy")
                    == Some(true),
                "legacy llm key should be honoured",
            )?;
            ensure(
                config.marketplace.token.expose_secret() == "legacy-token",
                "legacy marketplace token should be honoured",
            )?;
            Ok(())
        })();

        clear_vars(&CREDENTIAL_VARS);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        set_credentials();
        env::set_var("BAZAAR_LOG_LEVEL", "warn");
        env::set_var("BAZAAR_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&CREDENTIAL_VARS);
        clear_vars(&["BAZAAR_LOG_LEVEL", "BAZAAR_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        env::set_var("BAZAAR_LLM_MODEL", "model-from-env");
        env::set_var("BAZAAR_MARKETPLACE_TOKEN", "mp-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("bazaar.toml");
            fs::write(
                &path,
                r#"
[llm]
provider = "ollama"
base_url = "http://localhost:11434/v1"
model = "model-from-file"

[marketplace]
token = "mp-from-file"

[server]
port = 9000

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    server_port: Some(9100),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.llm.provider == LlmProvider::Ollama, "file provider should apply")?;
            ensure(config.llm.model == "model-from-env", "env model should win over file")?;
            ensure(config.server.port == 9100, "override port should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.marketplace.token.expose_secret() == "mp-from-env",
                "env marketplace token should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&["BAZAAR_LLM_MODEL", "BAZAAR_MARKETPLACE_TOKEN"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        env::set_var("BAZAAR_LLM_API_KEY", "sk-or-test");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("marketplace.token")
            );
            ensure(has_message, "validation failure should mention marketplace.token")
        })();

        clear_vars(&CREDENTIAL_VARS);
        result
    }

    #[test]
    fn ollama_provider_does_not_need_api_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                llm_provider: Some(LlmProvider::Ollama),
                llm_base_url: Some("http://localhost:11434/v1".to_string()),
                marketplace_token: Some("mp-test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map(|config| config.llm.api_key.is_none())
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(result, "ollama config should load without api key")
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        set_credentials();
        env::set_var("BAZAAR_SERVER_PORT", "eighty");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) if key == "BAZAAR_SERVER_PORT" => {
                Ok(())
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected invalid override error".to_string()),
        };

        clear_vars(&CREDENTIAL_VARS);
        clear_vars(&["BAZAAR_SERVER_PORT"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CREDENTIAL_VARS);

        env::set_var("BAZAAR_LLM_API_KEY", "sk-secret-value");
        env::set_var("BAZAAR_MARKETPLACE_TOKEN", "mp-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("sk-secret-value"), "debug output should not contain llm key")?;
            ensure(
                !debug.contains("mp-secret-value"),
                "debug output should not contain marketplace token",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&CREDENTIAL_VARS);
        result
    }
}
