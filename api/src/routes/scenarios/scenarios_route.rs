use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use context_search::{ScenarioPack, ScenarioSummary};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

pub async fn list_scenarios_route(State(state): State<Arc<AppState>>) -> Json<Vec<ScenarioSummary>> {
    Json(state.scenarios.list())
}

pub async fn get_scenario_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ScenarioPack>> {
    state
        .scenarios
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown scenario `{id}`")))
}
