use std::sync::Arc;

use ai_llm_service::health_service::{KeyStatus, probe_key};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, instrument};

use crate::core::{
    app_state::AppState,
    http::request_headers::{openai_key, request_id},
};

/// Probes the effective key with a tiny embedding request.
#[instrument(name = "openai_test_route", skip_all)]
pub async fn openai_test_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<KeyStatus>) {
    let status = match state.llm.client(openai_key(&headers)).await {
        Ok(client) => probe_key(&client).await,
        Err(err) => KeyStatus::from_error(&err),
    };
    debug!(request_id = request_id(&headers), ok = status.ok, "openai_test_route: probed key");
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(status))
}
