use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiConfigResponse {
    pub has_env_key: bool,
}

/// Whether the server has its own key, so the client knows to ask for one.
pub async fn openai_config_route(State(state): State<Arc<AppState>>) -> Json<OpenAiConfigResponse> {
    Json(OpenAiConfigResponse {
        has_env_key: state.llm.has_env_key(),
    })
}
