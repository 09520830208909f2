use std::path::PathBuf;

use ai_llm_service::{AiLlmError, LlmGateway, OpenAiSettings};
use context_search::{EmbeddingCache, ScenarioRegistry, SearchError};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:3000";

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error("failed to load scenarios: {0}")]
    Scenarios(#[from] SearchError),
}

/// Server-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "127.0.0.1:3000".
    pub api_address: String,
    /// Directory of scenario packs replacing the built-in ones.
    pub scenarios_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from `API_ADDRESS` and `SCENARIOS_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            scenarios_dir: get("SCENARIOS_DIR").map(PathBuf::from),
        }
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: AppConfig,
    /// OpenAI clients: the env-key client is shared, overrides are per request.
    pub llm: LlmGateway,
    pub scenarios: ScenarioRegistry,
    /// Chunk vectors keyed by scenario and embedding model.
    pub embeddings: EmbeddingCache,
}

impl AppState {
    pub fn new(config: AppConfig, settings: OpenAiSettings, scenarios: ScenarioRegistry) -> Self {
        Self {
            config,
            llm: LlmGateway::new(settings),
            scenarios,
            embeddings: EmbeddingCache::new(),
        }
    }

    /// Build everything from the environment.
    ///
    /// # Errors
    /// Invalid OpenAI settings or an unreadable `SCENARIOS_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AppConfig::from_env();
        let settings = OpenAiSettings::from_env()?;
        let scenarios = match &config.scenarios_dir {
            Some(dir) => ScenarioRegistry::from_dir(dir)?,
            None => ScenarioRegistry::builtin()?,
        };
        info!(
            address = %config.api_address,
            scenarios = scenarios.len(),
            has_env_key = settings.client.has_key(),
            "application state ready"
        );
        Ok(Self::new(config, settings, scenarios))
    }
}
