use std::sync::Arc;

use ai_llm_service::{
    AiLlmError, OpenAiService, OpenAiSettings, ResponseOutput, ResponseRequest,
};
use axum::{Json, extract::State, http::HeaderMap};
use context_search::prompt::{DEFAULT_COMPACT_TARGET_TOKENS, build_compact_prompt};
use tracing::{error, info, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::request_headers::{openai_key, request_id},
    },
    error_handler::{AppError, AppResult},
    routes::compact::{compact_request::CompactRequest, compact_response::CompactResponse},
};

const FAILED: AppError = AppError::Upstream {
    code: "COMPACT_FAILED",
    message: "Failed to compact",
};

/// Asks the compaction model to shorten `text` to about `target_tokens`.
pub(crate) async fn compact_text(
    client: &OpenAiService,
    settings: &OpenAiSettings,
    text: &str,
    target_tokens: u32,
) -> Result<ResponseOutput, AiLlmError> {
    let request = ResponseRequest {
        model: settings.compact_model.clone(),
        input: build_compact_prompt(text, target_tokens),
        max_output_tokens: settings.max_output_tokens,
        use_web: false,
    };
    client.respond(&request).await
}

#[instrument(name = "compact_route", skip_all)]
pub async fn compact_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<CompactRequest>,
) -> AppResult<Json<CompactResponse>> {
    let request_id = request_id(&headers);
    let target_tokens = r.target_tokens(DEFAULT_COMPACT_TARGET_TOKENS);
    let Some(text) = r.text.filter(|t| !t.is_empty()) else {
        return Err(AppError::bad_request("text is required"));
    };

    let client = state.llm.client(openai_key(&headers)).await.map_err(|err| {
        error!(request_id, error = %err, "compact_route: no usable OpenAI client");
        FAILED
    })?;

    let out = compact_text(&client, state.llm.settings(), &text, target_tokens)
        .await
        .map_err(|err| {
            error!(request_id, error = %err, "compact_route: compaction failed");
            FAILED
        })?;

    let duration_ms = out.latency.as_millis() as u64;
    info!(
        request_id,
        chars_in = text.chars().count(),
        chars_out = out.text.chars().count(),
        target_tokens,
        latency_ms = duration_ms,
        "compact_route: success"
    );

    Ok(Json(CompactResponse {
        compact: out.text,
        usage: out.usage,
        duration_ms,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;
    use crate::test_support;

    fn request(v: serde_json::Value) -> Json<CompactRequest> {
        Json(serde_json::from_value(v).unwrap())
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let state = test_support::state(None);
        for body in [json!({}), json!({ "text": "" })] {
            let err = compact_route(State(state.clone()), HeaderMap::new(), request(body))
                .await
                .unwrap_err();
            assert!(matches!(&err, AppError::BadRequest(m) if m == "text is required"));
        }
    }

    #[tokio::test]
    async fn compacts_with_the_compact_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": [{ "content": [{ "type": "output_text", "text": "Short." }] }],
                "usage": { "input_tokens": 300, "output_tokens": 20 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = test_support::state(Some(&server.uri()));
        let Json(resp) = compact_route(
            State(state),
            HeaderMap::new(),
            request(json!({ "text": "A very long reply.", "targetTokens": 64 })),
        )
        .await
        .unwrap();
        assert_eq!(resp.compact, "Short.");
        assert_eq!(resp.usage.unwrap().output_tokens, Some(20));

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let input = sent["input"].as_str().unwrap();
        assert!(input.contains("approximately 64 tokens"));
        assert!(input.contains("--- BEGIN REPLY ---\nA very long reply.\n--- END REPLY ---"));
    }

    #[tokio::test]
    async fn missing_key_is_a_compaction_failure() {
        let state = test_support::state(None);
        let err = compact_route(State(state), HeaderMap::new(), request(json!({ "text": "t" })))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to compact");
    }
}
