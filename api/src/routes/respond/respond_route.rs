use std::sync::Arc;

use ai_llm_service::{ResponseRequest, catalog};
use axum::{Json, extract::State, http::HeaderMap};
use context_search::{ScenarioChunk, prompt::build_input_text};
use tracing::{error, info, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::request_headers::{openai_key, request_id},
    },
    error_handler::{AppError, AppResult},
    routes::respond::{respond_request::RespondRequest, respond_response::RespondResponse},
};

const FAILED: AppError = AppError::Upstream {
    code: "RESPOND_FAILED",
    message: "Failed to generate response",
};

/// Runs the prompt with the selected context through the Responses API.
#[instrument(name = "respond_route", skip_all)]
pub async fn respond_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<RespondRequest>,
) -> AppResult<Json<RespondResponse>> {
    let request_id = request_id(&headers);

    let (Some(model), Some(prompt), Some(context)) = (
        r.model.filter(|m| !m.trim().is_empty()),
        r.prompt,
        r.context,
    ) else {
        return Err(AppError::bad_request(
            "model, prompt, and context[] are required",
        ));
    };

    let use_web = r.use_web.unwrap_or(false);
    let context: Vec<ScenarioChunk> = context.into_iter().map(Into::into).collect();
    let max_output_tokens = state.llm.settings().max_output_tokens;
    let request = ResponseRequest {
        model: model.clone(),
        input: build_input_text(&prompt, &context),
        max_output_tokens,
        use_web,
    };

    let client = state.llm.client(openai_key(&headers)).await.map_err(|err| {
        error!(request_id, error = %err, "respond_route: no usable OpenAI client");
        FAILED
    })?;

    let out = client.respond(&request).await.map_err(|err| {
        error!(request_id, %model, error = %err, "respond_route: completion failed");
        FAILED
    })?;

    let duration_ms = out.latency.as_millis() as u64;
    let estimated_cost_usd = catalog::estimate_cost_usd(&model, out.usage.as_ref());
    info!(
        request_id,
        %model,
        chunks = context.len(),
        use_web,
        latency_ms = duration_ms,
        "respond_route: success"
    );

    Ok(Json(RespondResponse {
        output: out.text,
        usage: out.usage,
        duration_ms,
        max_output_tokens,
        estimated_cost_usd,
    }))
}
