//! Default OpenAI settings loaded from environment variables.
//!
//! Only the API key is sensitive; everything else has a default so the
//! server starts without configuration and reports the missing key through
//! `/api/openai/config` instead of refusing to boot.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`               = bearer token (optional at startup)
//! - `OPENAI_BASE_URL`              = API base, default `https://api.openai.com`
//! - `LLM_TIMEOUT_SECS`             = per-request timeout, default 60
//! - `COMPLETION_MAX_OUTPUT_TOKENS` = output cap for `/api/respond`, default 1024
//! - `COMPACT_MODEL`                = model used for compaction, default `gpt-4o-mini`
//! - `EMBEDDING_MODEL`              = default embedding model, default `text-embedding-3-small`

use tracing::warn;

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{Result, parse_opt_u32, parse_opt_u64, validate_http_endpoint},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_COMPACT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Resolved settings for every OpenAI call the server makes.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// Client config built from the environment key (may lack a key).
    pub client: LlmModelConfig,
    /// Cap passed as `max_output_tokens` on completion requests.
    pub max_output_tokens: u32,
    pub compact_model: String,
    pub embedding_model: String,
}

impl OpenAiSettings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    /// Fails on malformed numbers or a base URL without an http(s) scheme.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY");
        if api_key.is_none() {
            warn!("OPENAI_API_KEY not set; OpenAI routes will fail until a key is configured");
        }

        let endpoint = get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;

        let timeout_secs = parse_opt_u64("LLM_TIMEOUT_SECS", get("LLM_TIMEOUT_SECS").as_deref())?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_output_tokens = parse_opt_u32(
            "COMPLETION_MAX_OUTPUT_TOKENS",
            get("COMPLETION_MAX_OUTPUT_TOKENS").as_deref(),
        )?
        .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);

        Ok(Self {
            client: LlmModelConfig {
                endpoint,
                api_key,
                timeout_secs: Some(timeout_secs),
            },
            max_output_tokens,
            compact_model: get("COMPACT_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPACT_MODEL.to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }
}
