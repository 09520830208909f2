//! Shared OpenAI gateway with per-key client caching.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches the client for the environment key. Clients for a caller-supplied
//!   key are built per request and never stored, so neither the client nor the
//!   secret outlives the request.
//! - Exposes the resolved [`OpenAiSettings`] for model defaults and caps.
//!
//! # Example
//! ```no_run
//! use ai_llm_service::{LlmGateway, OpenAiSettings};
//!
//! # async fn demo() -> Result<(), ai_llm_service::AiLlmError> {
//! let gateway = LlmGateway::new(OpenAiSettings::from_env()?);
//! let client = gateway.client(None).await?;
//! let v = client.embed("text-embedding-3-small", "Ferris").await?;
//! println!("Embedding dim = {}", v.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    config::{default_config::OpenAiSettings, llm_model_config::LlmModelConfig},
    error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Shared entry point for every OpenAI call.
pub struct LlmGateway {
    settings: OpenAiSettings,
    env_client: OnceCell<Arc<OpenAiService>>,
}

impl LlmGateway {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            settings,
            env_client: OnceCell::new(),
        }
    }

    /// Settings resolved at startup.
    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    /// True when the server itself has a key configured.
    pub fn has_env_key(&self) -> bool {
        self.settings.client.has_key()
    }

    /// Returns the shared env-key client, or a fresh uncached client
    /// authenticated with `key_override` when it is non-blank.
    ///
    /// # Errors
    /// `MissingApiKey` when neither key is available; `InvalidEndpoint` or
    /// transport errors from client construction.
    pub async fn client(
        &self,
        key_override: Option<&str>,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        match key_override.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let cfg: LlmModelConfig = self.settings.client.with_key(key);
                debug!(endpoint = %cfg.endpoint, "built per-request OpenAI client");
                Ok(Arc::new(OpenAiService::new(cfg)?))
            }
            None => self
                .env_client
                .get_or_try_init(|| async {
                    let cli = OpenAiService::new(self.settings.client.clone())?;
                    debug!(endpoint = %self.settings.client.endpoint, "cached env-key OpenAI client");
                    Ok::<_, AiLlmError>(Arc::new(cli))
                })
                .await
                .cloned(),
        }
    }

    /// Number of clients held by the gateway (0 or 1).
    pub fn cached_clients(&self) -> usize {
        usize::from(self.env_client.initialized())
    }
}
