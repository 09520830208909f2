use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use context_search::search::{
    compute_all_similarities, filter_by_threshold, resolve_threshold, sanitize_extra_chunks,
};
use tracing::{error, info, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::request_headers::{openai_key, request_id},
    },
    error_handler::{AppError, AppResult},
    routes::embeddings::{search_request::SearchRequest, search_response::SearchResponse},
};

const FAILED: AppError = AppError::Upstream {
    code: "EMBEDDING_SEARCH_FAILED",
    message: "Failed to search embeddings",
};

/// Scores a scenario's chunks (plus client-side extras) against a phrase.
#[instrument(name = "embedding_search_route", skip_all)]
pub async fn embedding_search_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    let request_id = request_id(&headers);

    let (Some(scenario_id), Some(phrase)) = (
        r.scenario_id.as_deref().filter(|s| !s.is_empty()),
        r.phrase.as_deref(),
    ) else {
        return Err(AppError::bad_request("scenarioId and phrase are required"));
    };

    let Some(scenario) = state.scenarios.get(scenario_id) else {
        return Err(AppError::NotFound("Unknown scenarioId".into()));
    };

    let threshold = resolve_threshold(r.min_similarity());
    let extras = sanitize_extra_chunks(r.extra_chunks.as_ref());
    let model = r
        .embedding_model()
        .unwrap_or(state.llm.settings().embedding_model.as_str());

    let client = state.llm.client(openai_key(&headers)).await.map_err(|err| {
        error!(request_id, error = %err, "embedding_search_route: no usable OpenAI client");
        FAILED
    })?;

    let scores = compute_all_similarities(
        &state.embeddings,
        client.as_ref(),
        scenario,
        phrase,
        model,
        &extras,
    )
    .await
    .map_err(|err| {
        error!(request_id, scenario = scenario_id, model, error = %err, "embedding_search_route: search failed");
        FAILED
    })?;
    let results = filter_by_threshold(&scores, threshold);

    info!(
        request_id,
        scenario = scenario_id,
        model,
        threshold,
        extras = extras.len(),
        hits = results.len(),
        scored = scores.len(),
        "embedding_search_route: success"
    );

    Ok(Json(SearchResponse { results, scores }))
}
