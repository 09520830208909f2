/// Configuration for one OpenAI client.
///
/// A client is defined by where it talks to and with which credentials;
/// the model is chosen per request, since the same key serves completions,
/// compaction and embeddings.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     timeout_secs: Some(30),
/// };
/// assert!(cfg.has_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LlmModelConfig {
    /// API base URL without the `/v1` suffix.
    pub endpoint: String,

    /// Bearer token; `None` means requests cannot be authenticated.
    pub api_key: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// True when a non-blank key is configured.
    pub fn has_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Returns a copy that authenticates with `key` instead of the configured one.
    pub fn with_key(&self, key: &str) -> Self {
        Self {
            api_key: Some(key.trim().to_string()),
            ..self.clone()
        }
    }
}
