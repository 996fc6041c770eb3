use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::yaml_include::load_yaml_with_includes;

pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_LLM_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_API_KEY_ENV: &str = "CLAUDE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml: {0}")]
    Yaml(#[from] yaml_rust2::ScanError),
    #[error("failed to re-emit merged yaml: {0}")]
    Emit(#[from] yaml_rust2::EmitError),
    #[error("config does not match schema: {0}")]
    Deserialize(#[from] serde_yml::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    pub project_name: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            project_name: "listing-guard".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub server_address: String,
    pub log_level: String,
    /// `*` allows any origin.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8888".to_string(),
            log_level: "info".to_string(),
            allowed_origin: "*".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub anthropic_version: String,
    /// Name of the environment variable holding the provider key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 400,
            timeout_ms: 20_000,
            anthropic_version: "2023-06-01".to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl LlmConfig {
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Invalid(format!("llm.endpoint {:?}: {}", self.endpoint, e)))
    }

    /// Reads the provider key from the environment. Blank values count as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HeuristicConfig {
    pub extra_payment_terms: Vec<String>,
    pub extra_crypto_markers: Vec<String>,
    pub unspecified_location_pattern: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub common: CommonConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub heuristic: HeuristicConfig,
}

impl Config {
    /// Loads a config file, resolving `!include` lines relative to it.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let merged = load_yaml_with_includes(config_path.as_ref())?;

        let mut contents = String::new();
        {
            let mut emitter = yaml_rust2::YamlEmitter::new(&mut contents);
            emitter.dump(&merged)?;
        }

        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = ?config_path.as_ref(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yml::from_str(contents)?;
        config.llm.endpoint_url()?;
        Ok(config)
    }
}
