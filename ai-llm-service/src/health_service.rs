//! API key health probe.
//!
//! The cheapest authenticated call OpenAI offers is a one-word embedding,
//! so the probe embeds `"ping"` and checks that a vector came back.
//! [`probe_key`] is resilient and never fails: errors map to `ok = false`.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::{error_handler::AiLlmError, services::open_ai_service::OpenAiService};

/// Model used by the probe regardless of the configured embedding model.
pub const PROBE_MODEL: &str = "text-embedding-3-small";

pub const MSG_VALID: &str = "API key is valid.";
pub const MSG_NO_DATA: &str = "Embedding request returned no data.";
pub const MSG_UNREACHABLE: &str =
    "Failed to reach OpenAI. Check OPENAI_API_KEY and network connectivity.";

/// Serializable outcome of a key probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    pub ok: bool,
    pub message: String,
}

impl KeyStatus {
    fn new(ok: bool, message: &str) -> Self {
        Self {
            ok,
            message: message.to_string(),
        }
    }

    /// Status for a key that could not even be turned into a client.
    pub fn from_error(err: &AiLlmError) -> Self {
        warn!(error = %err, "OpenAI key probe failed");
        Self::new(false, MSG_UNREACHABLE)
    }
}

/// Embeds `"ping"` and reports whether the key works.
pub async fn probe_key(client: &OpenAiService) -> KeyStatus {
    let started = Instant::now();
    match client.try_embed(PROBE_MODEL, "ping").await {
        Ok(Some(v)) if !v.is_empty() => {
            info!(
                endpoint = %client.endpoint(),
                latency_ms = started.elapsed().as_millis(),
                "OpenAI key probe succeeded"
            );
            KeyStatus::new(true, MSG_VALID)
        }
        Ok(_) => {
            warn!(endpoint = %client.endpoint(), "OpenAI key probe returned no vector");
            KeyStatus::new(false, MSG_NO_DATA)
        }
        Err(err) => KeyStatus::from_error(&err),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;
    use crate::config::llm_model_config::LlmModelConfig;

    async fn probe_with(template: ResponseTemplate) -> KeyStatus {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_partial_json(json!({ "model": PROBE_MODEL, "input": "ping" })))
            .respond_with(template)
            .mount(&server)
            .await;
        let client = OpenAiService::new(LlmModelConfig {
            endpoint: server.uri(),
            api_key: Some("sk-test".into()),
            timeout_secs: Some(5),
        })
        .unwrap();
        probe_key(&client).await
    }

    #[tokio::test]
    async fn valid_key() {
        let status = probe_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [0.1, 0.2] }]
        })))
        .await;
        assert_eq!(status, KeyStatus::new(true, MSG_VALID));
    }

    #[tokio::test]
    async fn empty_vector() {
        let status = probe_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "index": 0, "embedding": [] }]
        })))
        .await;
        assert_eq!(status, KeyStatus::new(false, MSG_NO_DATA));
    }

    #[tokio::test]
    async fn empty_data_array() {
        let status = probe_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] }))).await;
        assert_eq!(status, KeyStatus::new(false, MSG_NO_DATA));
    }

    #[tokio::test]
    async fn rejected_key() {
        let status = probe_with(ResponseTemplate::new(401)).await;
        assert_eq!(status, KeyStatus::new(false, MSG_UNREACHABLE));
    }
}
